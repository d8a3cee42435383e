use super::diff::SymbolicDiff;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantStatus {
    Satisfied,
    Violated,
}

impl InvariantStatus {
    pub fn is_satisfied(self) -> bool {
        matches!(self, InvariantStatus::Satisfied)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvariantStatus::Satisfied => "satisfied",
            InvariantStatus::Violated => "violated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantReport {
    pub dimension_consistency: InvariantStatus,
    pub palette_consistency: InvariantStatus,
    pub determinism: InvariantStatus,
    pub object_count_consistency: InvariantStatus,
}

impl InvariantReport {
    pub fn violated_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if !self.dimension_consistency.is_satisfied() {
            names.push("dimension_consistency");
        }
        if !self.palette_consistency.is_satisfied() {
            names.push("palette_consistency");
        }
        if !self.determinism.is_satisfied() {
            names.push("determinism");
        }
        if !self.object_count_consistency.is_satisfied() {
            names.push("object_count_consistency");
        }
        names
    }

    pub fn satisfied_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.dimension_consistency.is_satisfied() {
            names.push("dimension_consistency");
        }
        if self.palette_consistency.is_satisfied() {
            names.push("palette_consistency");
        }
        if self.determinism.is_satisfied() {
            names.push("determinism");
        }
        if self.object_count_consistency.is_satisfied() {
            names.push("object_count_consistency");
        }
        names
    }
}

/// Checks the four program-level invariants given the per-pair inputs and their
/// diffs. `determinism_holds` is computed by the caller (the critic), which is the
/// only place that re-runs the program a second time.
pub fn check_invariants(
    inputs: &[&Grid],
    diffs: &[Option<SymbolicDiff>],
    determinism_holds: bool,
) -> InvariantReport {
    InvariantReport {
        dimension_consistency: check_dimension_consistency(inputs, diffs),
        palette_consistency: check_palette_consistency(inputs, diffs),
        determinism: if determinism_holds {
            InvariantStatus::Satisfied
        } else {
            InvariantStatus::Violated
        },
        object_count_consistency: check_object_count_consistency(diffs),
    }
}

fn check_dimension_consistency(inputs: &[&Grid], diffs: &[Option<SymbolicDiff>]) -> InvariantStatus {
    let ratios: Vec<(usize, usize, usize, usize)> = inputs
        .iter()
        .zip(diffs)
        .filter_map(|(input, diff)| {
            let diff = diff.as_ref()?;
            Some((input.height(), input.width(), diff.predicted_shape.0, diff.predicted_shape.1))
        })
        .collect();
    if ratios.len() < 2 {
        return InvariantStatus::Satisfied;
    }
    let (base_ih, base_iw, base_oh, base_ow) = ratios[0];
    let consistent = ratios.iter().all(|&(ih, iw, oh, ow)| {
        oh * base_ih == base_oh * ih && ow * base_iw == base_ow * iw
    });
    if consistent {
        InvariantStatus::Satisfied
    } else {
        InvariantStatus::Violated
    }
}

fn check_palette_consistency(inputs: &[&Grid], diffs: &[Option<SymbolicDiff>]) -> InvariantStatus {
    for (input, diff) in inputs.iter().zip(diffs) {
        let Some(diff) = diff else { continue };
        // `extra_colors` is predicted minus expected, so it's disjoint from expected's
        // palette already; the predicted palette is a subset of in.palette ∪ out.palette
        // ∪ {0} iff every extra color is in in.palette ∪ {0}.
        let input_palette = input.palette();
        let violated = diff
            .extra_colors
            .iter()
            .any(|c| *c != 0 && !input_palette.contains(c));
        if violated {
            return InvariantStatus::Violated;
        }
    }
    InvariantStatus::Satisfied
}

/// Soft: when the check cannot be evaluated for a pair (object counts weren't
/// computed), it is reported satisfied rather than violated (resolves the spec's
/// internal inconsistency in favor of the soft interpretation).
fn check_object_count_consistency(diffs: &[Option<SymbolicDiff>]) -> InvariantStatus {
    for diff in diffs.iter().flatten() {
        match (diff.predicted_object_count, diff.expected_object_count) {
            (Some(p), Some(e)) if p != e => return InvariantStatus::Violated,
            _ => {}
        }
    }
    InvariantStatus::Satisfied
}
