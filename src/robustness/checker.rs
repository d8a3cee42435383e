use super::{mask_similarity, palette_similarity, perturbation, structural, CounterfactualResult, ExpectedBehavior};
use crate::critic::try_run;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::grid::Grid;
use crate::task::ARCTask;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessConfig {
    pub perturbation_rate: f64,
    pub seed: u64,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            perturbation_rate: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RobustnessReport {
    pub score: f64,
    pub results: Vec<CounterfactualResult>,
}

/// Generates counterfactual inputs from every training and test input via the
/// perturbation and structural families, runs the program on each, and averages
/// the per-counterfactual `consistency_score`. Never a veto: a program that the
/// critic has certified is never rejected here, only re-ranked (see
/// `crate::controller`).
pub fn check_robustness(ast: &Ast, task: &ARCTask, registry: &PrimitiveRegistry, config: &RobustnessConfig) -> RobustnessReport {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let bases: Vec<&Grid> = task
        .train
        .iter()
        .map(|p| &p.input)
        .chain(task.test.iter().map(|p| &p.input))
        .collect();

    let mut results = Vec::new();
    for (index, base) in bases.iter().enumerate() {
        let Ok(baseline) = try_run(ast, base, registry) else {
            continue;
        };
        let mut counterfactuals = perturbation::generate(base, config.perturbation_rate, &mut rng);
        counterfactuals.extend(structural::generate(base, config.seed.wrapping_add(index as u64)));
        for cf in counterfactuals {
            results.push(evaluate_one(ast, registry, &baseline, cf));
        }
    }

    let score = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.consistency_score).sum::<f64>() / results.len() as f64
    };

    RobustnessReport { score, results }
}

/// A cheap single-perturbation-per-training-pair estimate of robustness, used by
/// the synthesizer's selection scoring (`synth::scoring::selection_score`) to
/// compute the soft `robustness_bonus` §4.5 describes -- distinct from (and much
/// cheaper than) the full `check_robustness` report run once on the certified
/// winner in the ROBUSTNESS phase.
pub fn quick_robustness_score(ast: &Ast, task: &ARCTask, registry: &PrimitiveRegistry, seed: u64) -> f64 {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut scores = Vec::with_capacity(task.train.len());
    for pair in &task.train {
        let Ok(baseline) = try_run(ast, &pair.input, registry) else {
            continue;
        };
        if let Some(cf) = perturbation::generate(&pair.input, 0.1, &mut rng).into_iter().next() {
            scores.push(evaluate_one(ast, registry, &baseline, cf).consistency_score);
        }
    }
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn evaluate_one(
    ast: &Ast,
    registry: &PrimitiveRegistry,
    baseline: &Grid,
    cf: super::Counterfactual,
) -> CounterfactualResult {
    match try_run(ast, &cf.input, registry) {
        Err(_) => CounterfactualResult {
            label: cf.label,
            success: false,
            output: None,
            consistency_score: 0.0,
        },
        Ok(output) => {
            let consistency_score = consistency_score(baseline, &output, cf.expected_behavior);
            CounterfactualResult {
                label: cf.label,
                success: true,
                output: Some(output),
                consistency_score,
            }
        }
    }
}

fn consistency_score(baseline: &Grid, output: &Grid, expected: ExpectedBehavior) -> f64 {
    match expected {
        ExpectedBehavior::SameTransformation => {
            let same_shape = (baseline.height(), baseline.width()) == (output.height(), output.width());
            let dimension_sim = if same_shape { 1.0 } else { 0.5 };
            let palette_sim = palette_similarity(&baseline.palette(), &output.palette());
            (dimension_sim + palette_sim) / 2.0
        }
        ExpectedBehavior::SameStructure => {
            if (baseline.height(), baseline.width()) != (output.height(), output.width()) {
                0.3
            } else {
                mask_similarity(baseline, output)
            }
        }
        ExpectedBehavior::Unconstrained => {
            if output.area() > 0 {
                1.0
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::primitive;
    use crate::task::{ARCPair, TestPair};

    fn identity_task() -> ARCTask {
        let g = Grid::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]);
        ARCTask::new(
            "t",
            vec![ARCPair { input: g.clone(), output: g.clone() }],
            vec![TestPair { input: g, expected_output: None }],
        )
    }

    #[test]
    fn identity_program_scores_highly_under_perturbation() {
        let task = identity_task();
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("identity", vec![]);
        let report = check_robustness(&ast, &task, &registry, &RobustnessConfig::default());
        assert!(!report.results.is_empty());
        assert!(report.score > 0.7, "expected high robustness score, got {}", report.score);
    }

    #[test]
    fn quick_robustness_score_is_in_unit_range() {
        let task = identity_task();
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("identity", vec![]);
        let score = quick_robustness_score(&ast, &task, &registry, 7);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn fill_background_to_a_single_color_is_perfectly_stable_on_palette() {
        let task = identity_task();
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("fill_background", vec![crate::dsl::ast::literal(crate::dsl::Value::Color(1))]);
        let report = check_robustness(&ast, &task, &registry, &RobustnessConfig::default());
        assert!(report.score > 0.0);
    }

    #[test]
    fn every_result_has_a_score_in_unit_range() {
        let task = identity_task();
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("rotate90", vec![crate::dsl::ast::literal(crate::dsl::Value::Int(1))]);
        let report = check_robustness(&ast, &task, &registry, &RobustnessConfig::default());
        for r in &report.results {
            assert!((0.0..=1.0).contains(&r.consistency_score));
        }
    }
}
