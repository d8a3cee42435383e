use crate::task::ARCTask;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFeatures {
    pub input_shape: (usize, usize),
    pub output_shape: (usize, usize),
    pub same_dims: bool,
    pub input_palette_size: usize,
    pub output_palette_size: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskFeatures {
    pub pairs: Vec<PairFeatures>,
    pub train_count: usize,
    pub test_count: usize,
    pub consistent_dimensions: bool,
}

pub fn extract_features(task: &ARCTask) -> TaskFeatures {
    let pairs: Vec<PairFeatures> = task
        .train
        .iter()
        .map(|p| {
            let input_shape = (p.input.height(), p.input.width());
            let output_shape = (p.output.height(), p.output.width());
            PairFeatures {
                input_shape,
                output_shape,
                same_dims: input_shape == output_shape,
                input_palette_size: p.input.palette().len(),
                output_palette_size: p.output.palette().len(),
            }
        })
        .collect();

    let consistent_dimensions = task
        .train
        .windows(2)
        .all(|w| ratio(&w[0]) == ratio(&w[1]));

    TaskFeatures {
        train_count: task.train.len(),
        test_count: task.test.len(),
        consistent_dimensions,
        pairs,
    }
}

fn ratio(pair: &crate::task::ARCPair) -> Option<(usize, usize)> {
    if pair.input.height() == 0 || pair.input.width() == 0 {
        return None;
    }
    Some((
        pair.output.height() * 1000 / pair.input.height(),
        pair.output.width() * 1000 / pair.input.width(),
    ))
}

/// As a flat key->value dict: fraction of matching keys over the common keys of the
/// two feature sets, scaled by pair-count and shape agreement.
pub fn similarity(a: &TaskFeatures, b: &TaskFeatures) -> f64 {
    let mut matches = 0usize;
    let mut total = 0usize;

    total += 1;
    if a.consistent_dimensions == b.consistent_dimensions {
        matches += 1;
    }

    total += 1;
    if a.train_count == b.train_count {
        matches += 1;
    }

    total += 1;
    if a.test_count == b.test_count {
        matches += 1;
    }

    let pair_count = a.pairs.len().min(b.pairs.len());
    for i in 0..pair_count {
        total += 2;
        if a.pairs[i].same_dims == b.pairs[i].same_dims {
            matches += 1;
        }
        if a.pairs[i].input_palette_size == b.pairs[i].input_palette_size
            && a.pairs[i].output_palette_size == b.pairs[i].output_palette_size
        {
            matches += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    #[test]
    fn identical_tasks_have_similarity_one() {
        let task = ARCTask::new(
            "t",
            vec![ARCPair {
                input: Grid::from_rows(&[vec![1]]),
                output: Grid::from_rows(&[vec![1]]),
            }],
            vec![],
        );
        let features = extract_features(&task);
        assert_eq!(similarity(&features, &features), 1.0);
    }
}
