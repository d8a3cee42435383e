use crate::grid::extract::{extract_objects, Connectivity};
use crate::grid::Color;
use crate::task::ARCTask;
use std::collections::BTreeSet;

/// A fixed `(out.h/in.h, out.w/in.w)` ratio observed across every training pair,
/// expressed as the base pair's dimensions rather than a reduced fraction so it can
/// be checked against a new input by cross-multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionRatio {
    pub base_input: (usize, usize),
    pub base_output: (usize, usize),
}

impl DimensionRatio {
    /// The output dimensions this ratio implies for `input`, or `None` if `input`
    /// doesn't scale evenly (the ratio was observed on integer-sized training grids,
    /// a new input need not divide evenly).
    pub fn scaled_dims(&self, input: (usize, usize)) -> Option<(usize, usize)> {
        let (bih, biw) = self.base_input;
        let (boh, bow) = self.base_output;
        if bih == 0 || biw == 0 {
            return None;
        }
        let (ih, iw) = input;
        if (ih * boh) % bih != 0 || (iw * bow) % biw != 0 {
            return None;
        }
        Some((ih * boh / bih, iw * bow / biw))
    }

    pub fn matches(&self, input: (usize, usize), output: (usize, usize)) -> bool {
        let (bih, biw) = self.base_input;
        let (boh, bow) = self.base_output;
        let (ih, iw) = input;
        let (oh, ow) = output;
        oh * bih == boh * ih && ow * biw == bow * iw
    }
}

/// Facts extracted from `task.train` alone, before any program exists. Feeds the
/// synthesizer's constraint set and pruning decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInvariants {
    pub fixed_output_dims: Option<(usize, usize)>,
    pub dimension_ratio: Option<DimensionRatio>,
    pub input_palette: BTreeSet<Color>,
    pub output_palette: BTreeSet<Color>,
    pub output_palette_subset_of_input: bool,
    pub object_count_delta: Option<i64>,
}

/// Inspects training pairs only, never a candidate program.
pub fn extract_task_invariants(task: &ARCTask) -> TaskInvariants {
    let fixed_output_dims = constant_output_dims(task);
    let dimension_ratio = constant_dimension_ratio(task);
    let input_palette = task.train.iter().fold(BTreeSet::new(), |mut acc, p| {
        acc.extend(p.input.palette());
        acc
    });
    let output_palette = task.train.iter().fold(BTreeSet::new(), |mut acc, p| {
        acc.extend(p.output.palette());
        acc
    });
    let allowed: BTreeSet<Color> = input_palette.iter().copied().chain(std::iter::once(0)).collect();
    let output_palette_subset_of_input = output_palette.iter().all(|c| allowed.contains(c));
    let object_count_delta = constant_object_count_delta(task);

    TaskInvariants {
        fixed_output_dims,
        dimension_ratio,
        input_palette,
        output_palette,
        output_palette_subset_of_input,
        object_count_delta,
    }
}

fn constant_output_dims(task: &ARCTask) -> Option<(usize, usize)> {
    let mut pairs = task.train.iter();
    let first = pairs.next()?;
    let dims = (first.output.height(), first.output.width());
    pairs
        .all(|p| (p.output.height(), p.output.width()) == dims)
        .then_some(dims)
}

fn constant_dimension_ratio(task: &ARCTask) -> Option<DimensionRatio> {
    let mut pairs = task.train.iter();
    let first = pairs.next()?;
    if first.input.height() == 0 || first.input.width() == 0 {
        return None;
    }
    let ratio = DimensionRatio {
        base_input: (first.input.height(), first.input.width()),
        base_output: (first.output.height(), first.output.width()),
    };
    let consistent = pairs.all(|p| {
        let (ih, iw) = (p.input.height(), p.input.width());
        ih > 0 && iw > 0 && ratio.matches((ih, iw), (p.output.height(), p.output.width()))
    });
    consistent.then_some(ratio)
}

fn constant_object_count_delta(task: &ARCTask) -> Option<i64> {
    let mut pairs = task.train.iter();
    let first = pairs.next()?;
    let delta_of = |input_count: usize, output_count: usize| -> i64 {
        output_count as i64 - input_count as i64
    };
    let first_in = extract_objects(&first.input, 0, Connectivity::Four).len();
    let first_out = extract_objects(&first.output, 0, Connectivity::Four).len();
    let base_delta = delta_of(first_in, first_out);
    let consistent = pairs.all(|p| {
        let in_count = extract_objects(&p.input, 0, Connectivity::Four).len();
        let out_count = extract_objects(&p.output, 0, Connectivity::Four).len();
        delta_of(in_count, out_count) == base_delta
    });
    consistent.then_some(base_delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    fn task_with(pairs: Vec<(Grid, Grid)>) -> ARCTask {
        ARCTask::new(
            "t",
            pairs
                .into_iter()
                .map(|(input, output)| ARCPair { input, output })
                .collect(),
            vec![],
        )
    }

    #[test]
    fn detects_constant_output_dims() {
        let task = task_with(vec![
            (Grid::from_rows(&[vec![1]]), Grid::from_rows(&[vec![1, 1]])),
            (Grid::from_rows(&[vec![2, 2]]), Grid::from_rows(&[vec![2, 2]])),
        ]);
        let inv = extract_task_invariants(&task);
        assert_eq!(inv.fixed_output_dims, Some((1, 2)));
    }

    #[test]
    fn detects_dimension_ratio() {
        let task = task_with(vec![
            (Grid::from_rows(&[vec![1]]), Grid::from_rows(&[vec![1, 1], vec![1, 1]])),
            (Grid::from_rows(&[vec![2, 2]]), Grid::from_rows(&[vec![2, 2, 2, 2], vec![2, 2, 2, 2]])),
        ]);
        let inv = extract_task_invariants(&task);
        assert_eq!(
            inv.dimension_ratio,
            Some(DimensionRatio {
                base_input: (1, 1),
                base_output: (2, 2),
            })
        );
    }

    #[test]
    fn output_palette_subset_holds_for_recolor_free_tasks() {
        let task = task_with(vec![(
            Grid::from_rows(&[vec![1, 0]]),
            Grid::from_rows(&[vec![0, 1]]),
        )]);
        let inv = extract_task_invariants(&task);
        assert!(inv.output_palette_subset_of_input);
    }
}
