//! Task input/output shapes shared across the core: an `ARCTask` enters the
//! controller and a `SolverResult` leaves it.

use crate::grid::Grid;
use crate::trace::audit::AuditTrace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ARCPair {
    pub input: Grid,
    pub output: Grid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestPair {
    pub input: Grid,
    pub expected_output: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ARCTask {
    pub task_id: String,
    pub train: Vec<ARCPair>,
    pub test: Vec<TestPair>,
}

impl ARCTask {
    pub fn new(task_id: impl Into<String>, train: Vec<ARCPair>, test: Vec<TestPair>) -> Self {
        Self {
            task_id: task_id.into(),
            train,
            test,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResult {
    pub task_id: String,
    pub success: bool,
    pub predictions: Vec<Vec<Vec<u8>>>,
    pub audit: AuditTrace,
    pub error_message: Option<String>,
}

impl SolverResult {
    /// `true` iff the solve succeeded and the certifying program violated no invariants.
    pub fn is_certified(&self) -> bool {
        self.success && self.audit.constraints_violated.is_empty()
    }
}

// --- JSON wire shapes ------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPairJson {
    pub input: Vec<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<Vec<u8>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ARCTaskJson {
    #[serde(default)]
    pub task_id: Option<String>,
    pub train: Vec<TaskPairJson>,
    pub test: Vec<TaskPairJson>,
}

impl ARCTaskJson {
    /// Converts the wire shape into the internal task, dropping test outputs into
    /// `TestPair::expected_output` when present. Validates rectangularity of every
    /// grid -- a ragged row is reported as an `INVALID_FORMAT` refusal rather than
    /// panicking, so malformed input reaches the taxonomy in `crate::controller::refusal`
    /// instead of aborting ingestion. Does not validate bounds (size limits, palette
    /// range); that is `crate::controller::refusal::validate`'s job, run against the
    /// resulting `ARCTask`.
    pub fn into_task(self, fallback_id: impl Into<String>) -> Result<ARCTask, crate::controller::refusal::Refusal> {
        let task_id = self.task_id.unwrap_or_else(|| fallback_id.into());
        let mut train = Vec::with_capacity(self.train.len());
        for pair in self.train {
            let Some(output) = pair.output else { continue };
            train.push(ARCPair {
                input: Grid::try_from_rows(&pair.input).map_err(ragged_refusal)?,
                output: Grid::try_from_rows(&output).map_err(ragged_refusal)?,
            });
        }
        let mut test = Vec::with_capacity(self.test.len());
        for pair in self.test {
            let input = Grid::try_from_rows(&pair.input).map_err(ragged_refusal)?;
            let expected_output = pair
                .output
                .map(|o| Grid::try_from_rows(&o))
                .transpose()
                .map_err(ragged_refusal)?;
            test.push(TestPair { input, expected_output });
        }
        Ok(ARCTask {
            task_id,
            train,
            test,
        })
    }
}

fn ragged_refusal(message: String) -> crate::controller::refusal::Refusal {
    crate::controller::refusal::Refusal {
        reason: crate::controller::refusal::RefusalReason::InvalidFormat,
        explanation: message,
        suggestions: vec!["ensure every grid row has the same length".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::refusal::RefusalReason;

    #[test]
    fn into_task_refuses_ragged_rows_instead_of_panicking() {
        let json = ARCTaskJson {
            task_id: None,
            train: vec![TaskPairJson {
                input: vec![vec![0, 1, 0], vec![1, 1]],
                output: Some(vec![vec![0, 1, 0], vec![1, 1, 0]]),
            }],
            test: vec![TaskPairJson {
                input: vec![vec![0, 1, 0]],
                output: None,
            }],
        };
        let err = json.into_task("fallback").unwrap_err();
        assert_eq!(err.reason, RefusalReason::InvalidFormat);
    }

    #[test]
    fn into_task_accepts_well_formed_rows() {
        let json = ARCTaskJson {
            task_id: Some("t".to_string()),
            train: vec![TaskPairJson {
                input: vec![vec![0, 1]],
                output: Some(vec![vec![1, 0]]),
            }],
            test: vec![TaskPairJson {
                input: vec![vec![0, 1]],
                output: None,
            }],
        };
        let task = json.into_task("fallback").unwrap();
        assert_eq!(task.task_id, "t");
        assert_eq!(task.train.len(), 1);
    }
}
