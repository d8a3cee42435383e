use crate::grid::extract::{extract_objects, Connectivity};
use crate::grid::{Color, Grid};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffType {
    WrongColor,
    ExtraPixel,
    MissingPixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEntry {
    pub row: usize,
    pub col: usize,
    pub predicted: Color,
    pub expected: Color,
    pub diff_type: DiffType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicDiff {
    pub dimension_match: bool,
    pub predicted_shape: (usize, usize),
    pub expected_shape: (usize, usize),
    pub exact_match: bool,
    pub pixel_accuracy: f64,
    pub diff_entries: Vec<DiffEntry>,
    pub extra_colors: BTreeSet<Color>,
    pub missing_colors: BTreeSet<Color>,
    pub input_object_count: Option<usize>,
    pub predicted_object_count: Option<usize>,
    pub expected_object_count: Option<usize>,
}

/// Compares `predicted` against `expected` for one training pair. `with_objects`
/// toggles the (soft) per-pair object-count bookkeeping used by the object-count
/// invariant and pruning path.
pub fn compute_diff(
    input: &Grid,
    predicted: &Grid,
    expected: &Grid,
    with_objects: bool,
) -> SymbolicDiff {
    let predicted_shape = (predicted.height(), predicted.width());
    let expected_shape = (expected.height(), expected.width());
    let dimension_match = predicted_shape == expected_shape;

    let (pixel_accuracy, diff_entries, exact_match) = if dimension_match {
        let mut entries = Vec::new();
        let mut matches = 0usize;
        for r in 0..expected.height() {
            for c in 0..expected.width() {
                let p = predicted.get(r, c).unwrap();
                let e = expected.get(r, c).unwrap();
                if p == e {
                    matches += 1;
                    continue;
                }
                let diff_type = if e == 0 {
                    DiffType::ExtraPixel
                } else if p == 0 {
                    DiffType::MissingPixel
                } else {
                    DiffType::WrongColor
                };
                entries.push(DiffEntry {
                    row: r,
                    col: c,
                    predicted: p,
                    expected: e,
                    diff_type,
                });
            }
        }
        let total = expected.area().max(1) as f64;
        (matches as f64 / total, entries, matches == expected.area())
    } else {
        (0.0, Vec::new(), false)
    };

    let predicted_palette = predicted.palette();
    let expected_palette = expected.palette();
    let extra_colors: BTreeSet<Color> = predicted_palette
        .difference(&expected_palette)
        .copied()
        .collect();
    let missing_colors: BTreeSet<Color> = expected_palette
        .difference(&predicted_palette)
        .copied()
        .collect();

    let (input_object_count, predicted_object_count, expected_object_count) = if with_objects {
        (
            Some(extract_objects(input, 0, Connectivity::Four).len()),
            Some(extract_objects(predicted, 0, Connectivity::Four).len()),
            Some(extract_objects(expected, 0, Connectivity::Four).len()),
        )
    } else {
        (None, None, None)
    };

    SymbolicDiff {
        dimension_match,
        predicted_shape,
        expected_shape,
        exact_match,
        pixel_accuracy,
        diff_entries,
        extra_colors,
        missing_colors,
        input_object_count,
        predicted_object_count,
        expected_object_count,
    }
}

impl SymbolicDiff {
    pub fn to_summary(&self, pair_index: usize) -> crate::trace::audit::SymbolicDiffSummary {
        crate::trace::audit::SymbolicDiffSummary {
            pair_index,
            exact_match: self.exact_match,
            dimension_match: self.dimension_match,
            pixel_accuracy: self.pixel_accuracy,
            diff_count: self.diff_entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_no_diff_entries() {
        let g = Grid::from_rows(&[vec![1, 2]]);
        let diff = compute_diff(&g, &g, &g, false);
        assert!(diff.exact_match);
        assert_eq!(diff.pixel_accuracy, 1.0);
        assert!(diff.diff_entries.is_empty());
    }

    #[test]
    fn mismatched_shape_has_zero_accuracy() {
        let predicted = Grid::from_rows(&[vec![1]]);
        let expected = Grid::from_rows(&[vec![1, 1]]);
        let diff = compute_diff(&predicted, &predicted, &expected, false);
        assert!(!diff.dimension_match);
        assert_eq!(diff.pixel_accuracy, 0.0);
    }

    #[test]
    fn classifies_extra_and_missing_pixels() {
        let predicted = Grid::from_rows(&[vec![1, 0]]);
        let expected = Grid::from_rows(&[vec![0, 1]]);
        let diff = compute_diff(&predicted, &predicted, &expected, false);
        assert_eq!(diff.diff_entries.len(), 2);
        assert!(diff
            .diff_entries
            .iter()
            .any(|e| e.diff_type == DiffType::ExtraPixel));
        assert!(diff
            .diff_entries
            .iter()
            .any(|e| e.diff_type == DiffType::MissingPixel));
    }
}
