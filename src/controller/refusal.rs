use crate::task::ARCTask;
use serde::{Deserialize, Serialize};



#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefusalReason {
    InvalidFormat,
    MissingData,
    ExcessiveSize,
    TimeoutExpected,
    ConstraintViolation,
    SafetyConcern,
}

impl RefusalReason {
    pub fn code(self) -> &'static str {
        match self {
            RefusalReason::InvalidFormat => "INVALID_FORMAT",
            RefusalReason::MissingData => "MISSING_DATA",
            RefusalReason::ExcessiveSize => "EXCESSIVE_SIZE",
            RefusalReason::TimeoutExpected => "TIMEOUT_EXPECTED",
            RefusalReason::ConstraintViolation => "CONSTRAINT_VIOLATION",
            RefusalReason::SafetyConcern => "SAFETY_CONCERN",
        }
    }
}

impl std::fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone)]
pub struct Refusal {
    pub reason: RefusalReason,
    pub explanation: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RefusalLimits {
    pub max_grid_size: usize,
    pub max_train_pairs: usize,
    pub max_test_pairs: usize,
}

impl Default for RefusalLimits {
    fn default() -> Self {
        Self {
            max_grid_size: 30,
            max_train_pairs: 10,
            max_test_pairs: 5,
        }
    }
}

/// Validates preconditions before any synthesis is attempted: non-empty train/test,
/// pair counts within limits, grid dimensions in `(0, max_grid_size]`, cell values in
/// `0..=9`. Returns the first violation found, in the order checked.
pub fn validate(task: &ARCTask, limits: &RefusalLimits) -> Result<(), Refusal> {
    if task.train.is_empty() {
        return Err(Refusal {
            reason: RefusalReason::MissingData,
            explanation: "task has no training pairs".to_string(),
            suggestions: vec!["provide at least one training pair".to_string()],
        });
    }
    if task.test.is_empty() {
        return Err(Refusal {
            reason: RefusalReason::MissingData,
            explanation: "task has no test inputs".to_string(),
            suggestions: vec!["provide at least one test input".to_string()],
        });
    }
    if task.train.len() > limits.max_train_pairs {
        return Err(Refusal {
            reason: RefusalReason::ExcessiveSize,
            explanation: format!(
                "{} training pairs exceeds the limit of {}",
                task.train.len(),
                limits.max_train_pairs
            ),
            suggestions: vec!["split the task or raise RefusalLimits.max_train_pairs".to_string()],
        });
    }
    if task.test.len() > limits.max_test_pairs {
        return Err(Refusal {
            reason: RefusalReason::ExcessiveSize,
            explanation: format!(
                "{} test pairs exceeds the limit of {}",
                task.test.len(),
                limits.max_test_pairs
            ),
            suggestions: vec!["split the task or raise RefusalLimits.max_test_pairs".to_string()],
        });
    }

    let grids = task
        .train
        .iter()
        .flat_map(|p| [&p.input, &p.output])
        .chain(task.test.iter().flat_map(|p| {
            std::iter::once(&p.input).chain(p.expected_output.as_ref())
        }));

    for grid in grids {
        if grid.height() == 0 || grid.width() == 0 {
            return Err(Refusal {
                reason: RefusalReason::InvalidFormat,
                explanation: "grid has a zero dimension".to_string(),
                suggestions: vec!["every grid must be at least 1x1".to_string()],
            });
        }
        if grid.height() > limits.max_grid_size || grid.width() > limits.max_grid_size {
            return Err(Refusal {
                reason: RefusalReason::ExcessiveSize,
                explanation: format!(
                    "grid {}x{} exceeds the limit of {}",
                    grid.height(),
                    grid.width(),
                    limits.max_grid_size
                ),
                suggestions: vec!["crop or downsample the grid before submission".to_string()],
            });
        }
        if grid.palette().iter().any(|&c| c > 9) {
            return Err(Refusal {
                reason: RefusalReason::InvalidFormat,
                explanation: "grid contains a cell value outside 0..=9".to_string(),
                suggestions: vec!["remap cell values into 0..=9".to_string()],
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::{ARCPair, TestPair};

    #[test]
    fn empty_train_is_missing_data() {
        let task = ARCTask::new(
            "t",
            vec![],
            vec![TestPair {
                input: Grid::from_rows(&[vec![1]]),
                expected_output: None,
            }],
        );
        let err = validate(&task, &RefusalLimits::default()).unwrap_err();
        assert_eq!(err.reason, RefusalReason::MissingData);
    }

    #[test]
    fn oversized_grid_is_excessive_size() {
        let big = Grid::filled(31, 31, 0);
        let task = ARCTask::new(
            "t",
            vec![ARCPair {
                input: big.clone(),
                output: big.clone(),
            }],
            vec![TestPair {
                input: big,
                expected_output: None,
            }],
        );
        let err = validate(&task, &RefusalLimits::default()).unwrap_err();
        assert_eq!(err.reason, RefusalReason::ExcessiveSize);
    }

    #[test]
    fn well_formed_task_passes() {
        let g = Grid::from_rows(&[vec![1, 2]]);
        let task = ARCTask::new(
            "t",
            vec![ARCPair {
                input: g.clone(),
                output: g.clone(),
            }],
            vec![TestPair {
                input: g,
                expected_output: None,
            }],
        );
        assert!(validate(&task, &RefusalLimits::default()).is_ok());
    }
}
