use super::diff::{DiffType, SymbolicDiff};
use crate::grid::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DimensionFix {
    ScaleBy(usize),
    Crop,
    Transpose,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefinementHint {
    pub pair_index: usize,
    pub dimension_fix: Option<DimensionFix>,
    pub extra_colors: Vec<Color>,
    pub missing_colors: Vec<Color>,
    pub error_positions: Vec<(usize, usize)>,
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    ConcentratedInRow,
    ConcentratedInColumn,
    AllOneDiffType(DiffTypeTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTypeTag {
    WrongColor,
    ExtraPixel,
    MissingPixel,
}

impl From<DiffType> for DiffTypeTag {
    fn from(t: DiffType) -> Self {
        match t {
            DiffType::WrongColor => DiffTypeTag::WrongColor,
            DiffType::ExtraPixel => DiffTypeTag::ExtraPixel,
            DiffType::MissingPixel => DiffTypeTag::MissingPixel,
        }
    }
}

const MAX_ERROR_POSITIONS: usize = 10;

/// Emits per-pair suggestions for the refinement engine: a dimension-shape fix when
/// shapes disagree, the extra/missing color sets, up to 10 localized error
/// positions, and a detected pattern (errors concentrated in one row/column, or all
/// of one diff type) when one is present.
pub fn compute_refinement_hints(diffs: &[Option<SymbolicDiff>]) -> Vec<RefinementHint> {
    diffs
        .iter()
        .enumerate()
        .filter_map(|(i, diff)| diff.as_ref().map(|d| hint_for_pair(i, d)))
        .collect()
}

fn hint_for_pair(pair_index: usize, diff: &SymbolicDiff) -> RefinementHint {
    let dimension_fix = if diff.dimension_match {
        None
    } else {
        Some(infer_dimension_fix(diff))
    };
    let error_positions = diff
        .diff_entries
        .iter()
        .take(MAX_ERROR_POSITIONS)
        .map(|e| (e.row, e.col))
        .collect();
    let pattern = detect_pattern(diff);
    RefinementHint {
        pair_index,
        dimension_fix,
        extra_colors: diff.extra_colors.iter().copied().collect(),
        missing_colors: diff.missing_colors.iter().copied().collect(),
        error_positions,
        pattern,
    }
}

fn infer_dimension_fix(diff: &SymbolicDiff) -> DimensionFix {
    let (ph, pw) = diff.predicted_shape;
    let (eh, ew) = diff.expected_shape;
    if ph == ew && pw == eh && ph != pw {
        return DimensionFix::Transpose;
    }
    if ph > 0 && pw > 0 && eh % ph == 0 && ew % pw == 0 {
        let factor = eh / ph;
        if factor > 1 && factor == ew / pw {
            return DimensionFix::ScaleBy(factor);
        }
    }
    if ph > eh && pw >= ew && eh > 0 && ew > 0 {
        return DimensionFix::Crop;
    }
    DimensionFix::Unknown
}

fn detect_pattern(diff: &SymbolicDiff) -> Option<Pattern> {
    if diff.diff_entries.is_empty() {
        return None;
    }
    let first_row = diff.diff_entries[0].row;
    if diff.diff_entries.iter().all(|e| e.row == first_row) {
        return Some(Pattern::ConcentratedInRow);
    }
    let first_col = diff.diff_entries[0].col;
    if diff.diff_entries.iter().all(|e| e.col == first_col) {
        return Some(Pattern::ConcentratedInColumn);
    }
    let first_type = diff.diff_entries[0].diff_type;
    if diff.diff_entries.iter().all(|e| e.diff_type == first_type) {
        return Some(Pattern::AllOneDiffType(first_type.into()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::diff::compute_diff;
    use crate::grid::Grid;

    #[test]
    fn detects_scale_fix() {
        let input = Grid::from_rows(&[vec![1]]);
        let predicted = Grid::from_rows(&[vec![1]]);
        let expected = Grid::from_rows(&[vec![1, 1], vec![1, 1]]);
        let diff = compute_diff(&input, &predicted, &expected, false);
        let hints = compute_refinement_hints(&[Some(diff)]);
        assert_eq!(hints[0].dimension_fix, Some(DimensionFix::ScaleBy(2)));
    }

    #[test]
    fn detects_row_concentrated_pattern() {
        let input = Grid::from_rows(&[vec![1, 1], vec![1, 1]]);
        let predicted = Grid::from_rows(&[vec![1, 1], vec![1, 1]]);
        let expected = Grid::from_rows(&[vec![2, 2], vec![1, 1]]);
        let diff = compute_diff(&input, &predicted, &expected, false);
        let hints = compute_refinement_hints(&[Some(diff)]);
        assert_eq!(hints[0].pattern, Some(Pattern::ConcentratedInRow));
    }
}
