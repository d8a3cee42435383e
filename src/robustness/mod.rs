//! Robustness Checker: perturbs a certified program's inputs and measures how
//! stable its outputs remain. Never a veto -- see `crate::critic` for that -- this
//! is a soft signal folded back into the trace and, across invocations, into the
//! scheduler's re-ranking.

pub mod checker;
pub mod perturbation;
pub mod structural;

pub use checker::{check_robustness, quick_robustness_score, RobustnessConfig, RobustnessReport};
pub use perturbation::ExpectedBehavior;

use crate::grid::Grid;

/// One generated input alongside the comparison rule the checker should apply to
/// the program's output on it.
#[derive(Debug, Clone)]
pub struct Counterfactual {
    pub label: &'static str,
    pub input: Grid,
    pub expected_behavior: ExpectedBehavior,
}

#[derive(Debug, Clone)]
pub struct CounterfactualResult {
    pub label: &'static str,
    pub success: bool,
    pub output: Option<Grid>,
    pub consistency_score: f64,
}

/// Jaccard similarity over two color sets, boosted toward 1.0 when one set is a
/// subset of the other (a strict superset/subset relation is "close enough" for a
/// soft stability signal, even though it isn't exact agreement).
pub(crate) fn palette_similarity(a: &std::collections::BTreeSet<u8>, b: &std::collections::BTreeSet<u8>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count().max(1);
    let jaccard = intersection as f64 / union as f64;
    if jaccard >= 1.0 {
        return 1.0;
    }
    if a.is_subset(b) || b.is_subset(a) {
        return jaccard.max(0.75);
    }
    jaccard
}

/// Jaccard similarity over the two grids' non-background masks. Grids must share
/// dimensions -- callers check `same_transformation`'s dimension rule first.
pub(crate) fn mask_similarity(a: &Grid, b: &Grid) -> f64 {
    debug_assert_eq!((a.height(), a.width()), (b.height(), b.width()));
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (av, bv) in a.cells().iter().zip(b.cells().iter()) {
        let a_on = *av != 0;
        let b_on = *bv != 0;
        if a_on || b_on {
            union += 1;
        }
        if a_on && b_on {
            intersection += 1;
        }
    }
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}
