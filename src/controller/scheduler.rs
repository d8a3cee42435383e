use super::budget::{Expert, ExpertBudgets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Priors,
    Synthesis,
    Refinement,
    Robustness,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Priors => "PRIORS",
            Phase::Synthesis => "SYNTHESIS",
            Phase::Refinement => "REFINEMENT",
            Phase::Robustness => "ROBUSTNESS",
        }
    }

    /// Share of the overall wall-clock budget allotted to this phase.
    pub fn time_share(self) -> f64 {
        match self {
            Phase::Priors => 0.10,
            Phase::Synthesis => 0.60,
            Phase::Refinement => 0.20,
            Phase::Robustness => 0.10,
        }
    }

    pub fn order() -> [Phase; 4] {
        [Phase::Priors, Phase::Synthesis, Phase::Refinement, Phase::Robustness]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UncertaintyEstimate {
    pub epistemic: f64,
    pub aleatoric: f64,
    pub total: f64,
}

/// `epistemic = (1 - best_score) * max(0, 1 - num_candidates/100)`;
/// `aleatoric = min(1, score_variance)`; `total = min(1, epistemic + aleatoric)`.
pub fn estimate_uncertainty(best_score: f64, num_candidates: usize, score_variance: f64) -> UncertaintyEstimate {
    let epistemic = (1.0 - best_score) * (1.0 - num_candidates as f64 / 100.0).max(0.0);
    let aleatoric = score_variance.min(1.0);
    let total = (epistemic + aleatoric).min(1.0);
    UncertaintyEstimate {
        epistemic,
        aleatoric,
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reroute {
    ContinueSynthesis,
    ConsultWorldModel,
    ConsultMemory,
    None,
}

/// High epistemic uncertainty favors continuing synthesis while budget remains. High
/// aleatoric uncertainty favors consulting the world model, falling back to memory,
/// both gated on budget and on not having been tried yet this solve.
pub fn decide_reroute(
    uncertainty: UncertaintyEstimate,
    budgets: &ExpertBudgets,
    wme_tried: bool,
    mal_tried: bool,
) -> Reroute {
    if uncertainty.epistemic > 0.5 && !budgets.get(Expert::Synthesizer).is_exhausted() {
        return Reroute::ContinueSynthesis;
    }
    if uncertainty.aleatoric > 0.5 {
        if !wme_tried && !budgets.get(Expert::Wme).is_exhausted() {
            return Reroute::ConsultWorldModel;
        }
        if !mal_tried && !budgets.get(Expert::Mal).is_exhausted() {
            return Reroute::ConsultMemory;
        }
    }
    Reroute::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn phase_shares_sum_to_one() {
        let total: f64 = Phase::order().iter().map(|p| p.time_share()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn high_epistemic_continues_synthesis() {
        let budgets = ExpertBudgets::new(Duration::from_secs(60), 10_000);
        let uncertainty = UncertaintyEstimate {
            epistemic: 0.9,
            aleatoric: 0.0,
            total: 0.9,
        };
        assert_eq!(decide_reroute(uncertainty, &budgets, false, false), Reroute::ContinueSynthesis);
    }

    #[test]
    fn high_aleatoric_consults_world_model_first() {
        let budgets = ExpertBudgets::new(Duration::from_secs(60), 10_000);
        let uncertainty = UncertaintyEstimate {
            epistemic: 0.0,
            aleatoric: 0.9,
            total: 0.9,
        };
        assert_eq!(decide_reroute(uncertainty, &budgets, false, false), Reroute::ConsultWorldModel);
    }
}
