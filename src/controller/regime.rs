use crate::task::ARCTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    ArcDiscrete,
    Uncertain,
}

impl Regime {
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::ArcDiscrete => "ARC_DISCRETE",
            Regime::Uncertain => "UNCERTAIN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegimeDetection {
    pub regime: Regime,
    pub confidence: f64,
    pub rationale: String,
}

const DISCRETE_MAX_AREA: f64 = 400.0;
const DISCRETE_MAX_COLORS: usize = 6;

/// Classifies a task from cheap signals alone, before any synthesis runs: average
/// grid area, color-palette size, whether input/output dimensions are consistent
/// across pairs, and training-pair count.
pub fn detect_regime(task: &ARCTask) -> RegimeDetection {
    if task.train.is_empty() {
        return RegimeDetection {
            regime: Regime::Uncertain,
            confidence: 0.0,
            rationale: "no training pairs to inspect".to_string(),
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

    let dims_consistent = task
        .train
        .windows(2)
        .all(|w| ratio_matches(&w[0], &w[1]));

    let mut score = 0.0;
    let mut reasons = Vec::new();

    if avg_area <= DISCRETE_MAX_AREA {
        score += 0.35;
        reasons.push(format!("avg grid area {avg_area:.0} is small"));
    } else {
        reasons.push(format!("avg grid area {avg_area:.0} is large"));
    }
    if colors.len() <= DISCRETE_MAX_COLORS {
        score += 0.35;
        reasons.push(format!("{} colors used", colors.len()));
    } else {
        reasons.push(format!("{} colors is a wide palette", colors.len()));
    }
    if dims_consistent {
        score += 0.2;
        reasons.push("input/output dimension ratio is consistent".to_string());
    } else {
        reasons.push("input/output dimension ratio varies across pairs".to_string());
    }
    if task.train.len() >= 2 {
        score += 0.1;
        reasons.push(format!("{} training pairs", task.train.len()));
    } else {
        reasons.push("only one training pair".to_string());
    }

    let regime = if score >= 0.6 {
        Regime::ArcDiscrete
    } else {
        Regime::Uncertain
    };

    RegimeDetection {
        regime,
        confidence: score.min(1.0),
        rationale: reasons.join("; "),
    }
}

fn ratio_matches(a: &crate::task::ARCPair, b: &crate::task::ARCPair) -> bool {
    let (aih, aiw, aoh, aow) = (a.input.height(), a.input.width(), a.output.height(), a.output.width());
    let (bih, biw, boh, bow) = (b.input.height(), b.input.width(), b.output.height(), b.output.width());
    if aih == 0 || aiw == 0 || bih == 0 || biw == 0 {
        return false;
    }
    aoh * bih == boh * aih && aow * biw == bow * aiw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    #[test]
    fn small_consistent_task_is_arc_discrete() {
        let task = ARCTask::new(
            "t",
            vec![
                ARCPair {
                    input: Grid::from_rows(&[vec![1]]),
                    output: Grid::from_rows(&[vec![1]]),
                },
                ARCPair {
                    input: Grid::from_rows(&[vec![2]]),
                    output: Grid::from_rows(&[vec![2]]),
                },
            ],
            vec![],
        );
        let detection = detect_regime(&task);
        assert_eq!(detection.regime, Regime::ArcDiscrete);
    }

    #[test]
    fn empty_train_is_uncertain() {
        let task = ARCTask::new("t", vec![], vec![]);
        assert_eq!(detect_regime(&task).regime, Regime::Uncertain);
    }
}
