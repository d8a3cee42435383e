use crate::task::ARCTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyBucket {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyBucket::Easy => "easy",
            DifficultyBucket::Medium => "medium",
            DifficultyBucket::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DifficultyEstimate {
    pub bucket: DifficultyBucket,
    pub solvability: f64,
    pub rationale: String,
}

/// Advisory telemetry only -- never a refusal path. Scores expected difficulty from
/// average grid size, palette size, dimension constancy, and training-pair count.
pub fn estimate_difficulty(task: &ARCTask) -> DifficultyEstimate {
    if task.train.is_empty() {
        return DifficultyEstimate {
            bucket: DifficultyBucket::Hard,
            solvability: 0.0,
            rationale: "no training pairs".to_string(),
        };
    }

    let areas: Vec<f64> = task
        .train
        .iter()
        .flat_map(|p| [p.input.area() as f64, p.output.area() as f64])
        .collect();
    let avg_area = areas.iter().sum::<f64>() / areas.len() as f64;

    let colors: std::collections::BTreeSet<u8> = task.train.iter().fold(
        std::collections::BTreeSet::new(),
        |mut acc, p| {
            acc.extend(p.input.palette());
            acc.extend(p.output.palette());
            acc
        },
    );

    let constant_dims = task
        .train
        .iter()
        .map(|p| (p.output.height(), p.output.width()))
        .collect::<std::collections::HashSet<_>>()
        .len()
        == 1;

    let mut penalty = 0.0;
    let mut reasons = Vec::new();

    if avg_area > 200.0 {
        penalty += 0.3;
        reasons.push(format!("large avg area {avg_area:.0}"));
    }
    if colors.len() > 5 {
        penalty += 0.2;
        reasons.push(format!("{} colors", colors.len()));
    }
    if !constant_dims {
        penalty += 0.25;
        reasons.push("output dims vary across pairs".to_string());
    }
    if task.train.len() < 3 {
        penalty += 0.15;
        reasons.push(format!("only {} training pairs", task.train.len()));
    }

    let solvability = (1.0 - penalty).clamp(0.0, 1.0);
    let bucket = if solvability >= 0.7 {
        DifficultyBucket::Easy
    } else if solvability >= 0.4 {
        DifficultyBucket::Medium
    } else {
        DifficultyBucket::Hard
    };
    if reasons.is_empty() {
        reasons.push("small, consistent, well-sampled task".to_string());
    }

    DifficultyEstimate {
        bucket,
        solvability,
        rationale: reasons.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    #[test]
    fn simple_repeated_task_is_easy() {
        let pair = || ARCPair {
            input: Grid::from_rows(&[vec![1]]),
            output: Grid::from_rows(&[vec![1]]),
        };
        let task = ARCTask::new("t", vec![pair(), pair(), pair()], vec![]);
        assert_eq!(estimate_difficulty(&task).bucket, DifficultyBucket::Easy);
    }
}
