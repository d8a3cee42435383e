use crate::critic::{extract_task_invariants, DimensionRatio, TaskInvariants};
use crate::grid::extract::{extract_objects, Connectivity};
use crate::grid::Grid;
use crate::task::ARCTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Hard,
    Soft,
}

#[derive(Debug, Clone)]
pub enum Constraint {
    DimensionMatch(DimensionRatio),
    PaletteSubset { allowed: std::collections::BTreeSet<u8> },
    ObjectCount { delta: i64 },
}

impl Constraint {
    pub fn severity(&self) -> Severity {
        match self {
            Constraint::DimensionMatch(_) | Constraint::PaletteSubset { .. } => Severity::Hard,
            Constraint::ObjectCount { .. } => Severity::Soft,
        }
    }

    /// Checks a predicted grid against `input`. `true` means satisfied (or, for the
    /// soft object-count check, inapplicable rather than violated).
    pub fn check(&self, input: &Grid, predicted: &Grid) -> bool {
        match self {
            Constraint::DimensionMatch(ratio) => ratio.matches(
                (input.height(), input.width()),
                (predicted.height(), predicted.width()),
            ),
            Constraint::PaletteSubset { allowed } => predicted.palette().iter().all(|c| allowed.contains(c)),
            Constraint::ObjectCount { delta } => {
                let in_count = extract_objects(input, 0, Connectivity::Four).len();
                let out_count = extract_objects(predicted, 0, Connectivity::Four).len();
                out_count as i64 - in_count as i64 == *delta
            }
        }
    }
}

/// Built from `extract_task_invariants` per the resolved Open Question: a hard
/// dimension-ratio constraint when one was observed, a hard palette-subset constraint
/// from the observed output-palette union, and a soft object-count-delta constraint.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn from_task(task: &ARCTask) -> Self {
        Self::from_invariants(&extract_task_invariants(task))
    }

    pub fn from_invariants(invariants: &TaskInvariants) -> Self {
        let mut constraints = Vec::new();
        if let Some(ratio) = invariants.dimension_ratio {
            constraints.push(Constraint::DimensionMatch(ratio));
        }
        let allowed: std::collections::BTreeSet<u8> = invariants
            .input_palette
            .iter()
            .chain(invariants.output_palette.iter())
            .copied()
            .chain(std::iter::once(0))
            .collect();
        constraints.push(Constraint::PaletteSubset { allowed });
        if let Some(delta) = invariants.object_count_delta {
            constraints.push(Constraint::ObjectCount { delta });
        }
        Self { constraints }
    }

    /// `true` iff every hard constraint is satisfied. Soft constraints never cause
    /// rejection through this gate.
    pub fn satisfied(&self, input: &Grid, predicted: &Grid) -> bool {
        self.constraints
            .iter()
            .filter(|c| c.severity() == Severity::Hard)
            .all(|c| c.check(input, predicted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ARCPair;

    #[test]
    fn dimension_match_constraint_catches_wrong_shape() {
        let task = ARCTask::new(
            "t",
            vec![ARCPair {
                input: Grid::from_rows(&[vec![1]]),
                output: Grid::from_rows(&[vec![1, 1], vec![1, 1]]),
            }],
            vec![],
        );
        let set = ConstraintSet::from_task(&task);
        let input = Grid::from_rows(&[vec![2]]);
        let good = Grid::from_rows(&[vec![2, 2], vec![2, 2]]);
        let bad = Grid::from_rows(&[vec![2]]);
        assert!(set.satisfied(&input, &good));
        assert!(!set.satisfied(&input, &bad));
    }
}
