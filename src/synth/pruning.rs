use super::config::SynthesisConfig;
use super::constraint_set::ConstraintSet;
use crate::grid::extract::{extract_objects, Connectivity};
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    Crashed,
    AbsurdDimension,
    DimensionMismatch,
    PaletteViolation,
    ObjectCountSeverity,
    BelowMinPixelAccuracy,
}

/// Per-pair prune decision for one predicted output against its expected output.
/// `None` means the candidate survives this pair.
pub fn prune_reason(
    config: &SynthesisConfig,
    input: &Grid,
    predicted: &Grid,
    expected: &Grid,
    constraints: Option<&ConstraintSet>,
) -> Option<PruneReason> {
    if let Some(set) = constraints {
        if config.use_constraint_set && !set.satisfied(input, predicted) {
            return Some(PruneReason::DimensionMismatch);
        }
    }

    let shape_mismatch = predicted.height() != expected.height() || predicted.width() != expected.width();
    if config.use_dimension_pruning && shape_mismatch {
        let absurd = predicted.height() == 0
            || predicted.width() == 0
            || predicted.height() > 100
            || predicted.width() > 100;
        if absurd {
            return Some(PruneReason::AbsurdDimension);
        }
    }

    if config.use_palette_pruning {
        let expected_allowed: std::collections::BTreeSet<u8> =
            expected.palette().into_iter().chain(std::iter::once(0)).collect();
        if !predicted.palette().iter().all(|c| expected_allowed.contains(c)) {
            return Some(PruneReason::PaletteViolation);
        }
    }

    if config.use_object_count_pruning {
        let severity = object_count_severity(input, predicted, expected);
        if severity > 0.8 {
            return Some(PruneReason::ObjectCountSeverity);
        }
    }

    if config.min_pixel_accuracy > 0.0 && pixel_accuracy(predicted, expected) < config.min_pixel_accuracy {
        return Some(PruneReason::BelowMinPixelAccuracy);
    }

    None
}

/// Fraction of cells that agree, ignoring shape; `0.0` when the shapes differ
/// outright. Gates `SynthesisConfig::min_pixel_accuracy` (§4.5): an expansion
/// that cannot even clear this floor on one training pair is dropped before it
/// ever reaches scoring.
fn pixel_accuracy(predicted: &Grid, expected: &Grid) -> f64 {
    if predicted.height() != expected.height() || predicted.width() != expected.width() {
        return 0.0;
    }
    let total = expected.cells().len().max(1);
    let matching = predicted
        .cells()
        .iter()
        .zip(expected.cells().iter())
        .filter(|(a, b)| a == b)
        .count();
    matching as f64 / total as f64
}

/// `0.0` means counts agree; `1.0` means maximally divergent, scaled by the larger
/// count so a difference of N objects matters less on a busy grid.
fn object_count_severity(_input: &Grid, predicted: &Grid, expected: &Grid) -> f64 {
    let predicted_count = extract_objects(predicted, 0, Connectivity::Four).len();
    let expected_count = extract_objects(expected, 0, Connectivity::Four).len();
    let denom = predicted_count.max(expected_count).max(1) as f64;
    (predicted_count as f64 - expected_count as f64).abs() / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absurd_dimension_is_pruned() {
        let config = SynthesisConfig::default();
        let input = Grid::from_rows(&[vec![1]]);
        let predicted = Grid::filled(0, 0, 0);
        let expected = Grid::from_rows(&[vec![1, 1]]);
        assert_eq!(
            prune_reason(&config, &input, &predicted, &expected, None),
            Some(PruneReason::AbsurdDimension)
        );
    }

    #[test]
    fn matching_shape_and_palette_survives() {
        let config = SynthesisConfig::default();
        let input = Grid::from_rows(&[vec![1]]);
        let predicted = Grid::from_rows(&[vec![1]]);
        let expected = Grid::from_rows(&[vec![1]]);
        assert_eq!(prune_reason(&config, &input, &predicted, &expected, None), None);
    }

    #[test]
    fn palette_outside_expected_is_pruned() {
        let config = SynthesisConfig::default();
        let input = Grid::from_rows(&[vec![1]]);
        let predicted = Grid::from_rows(&[vec![5]]);
        let expected = Grid::from_rows(&[vec![1]]);
        assert_eq!(
            prune_reason(&config, &input, &predicted, &expected, None),
            Some(PruneReason::PaletteViolation)
        );
    }

    #[test]
    fn below_min_pixel_accuracy_is_pruned_when_the_floor_is_set() {
        let mut config = SynthesisConfig::default();
        config.use_palette_pruning = false;
        config.min_pixel_accuracy = 0.9;
        let input = Grid::from_rows(&[vec![1, 1]]);
        let predicted = Grid::from_rows(&[vec![1, 5]]);
        let expected = Grid::from_rows(&[vec![1, 1]]);
        assert_eq!(
            prune_reason(&config, &input, &predicted, &expected, None),
            Some(PruneReason::BelowMinPixelAccuracy)
        );
    }

    #[test]
    fn min_pixel_accuracy_of_zero_never_prunes() {
        let config = SynthesisConfig::default();
        assert_eq!(config.min_pixel_accuracy, 0.0);
        let input = Grid::from_rows(&[vec![1, 1]]);
        let predicted = Grid::filled(1, 2, 0);
        let expected = Grid::from_rows(&[vec![1, 1]]);
        assert_eq!(prune_reason(&config, &input, &predicted, &expected, None), None);
    }
}
