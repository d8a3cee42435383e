use super::config::SynthesisConfig;
use crate::critic::CriticResult;
use crate::dsl::Ast;

/// `100` on an all-exact match; otherwise `average_pixel_accuracy * 50`; then an MDL
/// penalty of `0.1 * size(ast)` is subtracted.
pub fn score(ast: &Ast, critic: &CriticResult) -> f64 {
    let base = if critic.exact_match_all_pairs() {
        100.0
    } else {
        critic.avg_pixel_accuracy * 50.0
    };
    base - 0.1 * ast.size() as f64
}

/// Soft re-ranking used only when narrowing the beam (§4.5 "Hard-veto selection"):
/// `base_score` minus a `wme_length_weight`-scaled length penalty, plus (when
/// `use_wme`) a `wme_robustness_weight`-scaled bonus from a lightweight
/// perturbation check (`robustness::quick_robustness_score`). This never feeds
/// back into exact-match detection, near-miss thresholding, or the final
/// best-effort pick -- those stay on `score` alone, so the critic's exact-match
/// veto is never overridden by a soft bonus.
pub fn selection_score(base_score: f64, ast: &Ast, config: &SynthesisConfig, quick_robustness: f64) -> f64 {
    let length_penalty = config.wme_length_weight * ast.size() as f64;
    let robustness_bonus = if config.use_wme {
        config.wme_robustness_weight * quick_robustness
    } else {
        0.0
    };
    base_score - length_penalty + robustness_bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critic::evaluate;
    use crate::dsl::ast::primitive;
    use crate::dsl::PrimitiveRegistry;
    use crate::grid::Grid;
    use crate::task::{ARCPair, ARCTask};

    #[test]
    fn exact_match_scores_near_one_hundred() {
        let g = Grid::from_rows(&[vec![1, 2]]);
        let task = ARCTask::new("t", vec![ARCPair { input: g.clone(), output: g }], vec![]);
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("identity", vec![]);
        let critic = evaluate(&ast, &task, &registry);
        let s = score(&ast, &critic);
        assert!(s > 98.0 && s <= 100.0);
    }

    #[test]
    fn selection_score_ignores_robustness_bonus_when_wme_disabled() {
        let ast = primitive("identity", vec![]);
        let mut config = SynthesisConfig::default();
        config.use_wme = false;
        config.wme_length_weight = 0.05;
        let with_high_robustness = selection_score(50.0, &ast, &config, 1.0);
        let with_low_robustness = selection_score(50.0, &ast, &config, 0.0);
        assert_eq!(with_high_robustness, with_low_robustness);
    }

    #[test]
    fn selection_score_rewards_robustness_when_wme_enabled() {
        let ast = primitive("identity", vec![]);
        let mut config = SynthesisConfig::default();
        config.use_wme = true;
        config.wme_robustness_weight = 0.1;
        let with_robustness = selection_score(50.0, &ast, &config, 1.0);
        let without_robustness = selection_score(50.0, &ast, &config, 0.0);
        assert!(with_robustness > without_robustness);
    }
}
