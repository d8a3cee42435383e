use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expert {
    Cre,
    Wme,
    Mal,
    Synthesizer,
    Refinement,
}

impl Expert {
    pub fn as_str(self) -> &'static str {
        match self {
            Expert::Cre => "CRE",
            Expert::Wme => "WME",
            Expert::Mal => "MAL",
            Expert::Synthesizer => "SYNTHESIZER",
            Expert::Refinement => "REFINEMENT",
        }
    }

    /// `(time_share, iteration_share, priority)`. Shares are independent per-expert
    /// ceilings, not a partition of 1.0 -- see DESIGN.md.
    fn shares(self) -> (f64, f64, f64) {
        match self {
            Expert::Cre => (0.6, 0.7, 1.0),
            Expert::Wme => (0.1, 0.05, 0.4),
            Expert::Mal => (0.1, 0.05, 0.3),
            Expert::Synthesizer => (0.4, 0.5, 0.9),
            Expert::Refinement => (0.2, 0.2, 0.6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpertBudget {
    pub expert: Expert,
    pub time_budget: Duration,
    pub iteration_budget: usize,
    pub priority: f64,
    pub time_used: Duration,
    pub iterations_used: usize,
}

impl ExpertBudget {
    fn new(expert: Expert, total_time: Duration, total_iterations: usize) -> Self {
        let (time_share, iter_share, priority) = expert.shares();
        Self {
            expert,
            time_budget: total_time.mul_f64(time_share),
            iteration_budget: ((total_iterations as f64) * iter_share) as usize,
            priority,
            time_used: Duration::ZERO,
            iterations_used: 0,
        }
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_budget.saturating_sub(self.time_used)
    }

    pub fn iterations_remaining(&self) -> usize {
        self.iteration_budget.saturating_sub(self.iterations_used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.time_remaining() == Duration::ZERO || self.iterations_remaining() == 0
    }

    pub fn record_usage(&mut self, elapsed: Duration, iterations: usize) {
        self.time_used += elapsed;
        self.iterations_used += iterations;
    }
}

#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub expert: Expert,
    pub elapsed: Duration,
    pub iterations: usize,
}

/// Tracks the per-expert budgets plus a cumulative usage history, for the scheduler's
/// routing decisions and the final summary.
#[derive(Debug, Clone)]
pub struct ExpertBudgets {
    pub budgets: Vec<ExpertBudget>,
    pub history: Vec<UsageRecord>,
    start: Instant,
    total_time_budget: Duration,
}

impl ExpertBudgets {
    pub fn new(total_time_budget: Duration, total_iteration_budget: usize) -> Self {
        let budgets = [
            Expert::Cre,
            Expert::Wme,
            Expert::Mal,
            Expert::Synthesizer,
            Expert::Refinement,
        ]
        .into_iter()
        .map(|e| ExpertBudget::new(e, total_time_budget, total_iteration_budget))
        .collect();
        Self {
            budgets,
            history: Vec::new(),
            start: Instant::now(),
            total_time_budget,
        }
    }

    pub fn get(&self, expert: Expert) -> &ExpertBudget {
        self.budgets.iter().find(|b| b.expert == expert).expect("all experts registered")
    }

    pub fn record(&mut self, expert: Expert, elapsed: Duration, iterations: usize) {
        if let Some(b) = self.budgets.iter_mut().find(|b| b.expert == expert) {
            b.record_usage(elapsed, iterations);
        }
        self.history.push(UsageRecord {
            expert,
            elapsed,
            iterations,
        });
    }

    /// The total wall-clock budget has been exceeded, independent of per-expert ceilings.
    pub fn overall_time_exhausted(&self) -> bool {
        self.start.elapsed() >= self.total_time_budget
    }

    pub fn overall_time_remaining(&self) -> Duration {
        self.total_time_budget.saturating_sub(self.start.elapsed())
    }

    /// Picks the next expert by `priority * time_remaining` among those not exhausted.
    /// Falls back to `Cre` (noting exhaustion) if every budget is spent.
    pub fn next_expert(&self) -> (Expert, String) {
        let candidate = self
            .budgets
            .iter()
            .filter(|b| !b.is_exhausted())
            .max_by(|a, b| {
                let score_a = a.priority * a.time_remaining().as_secs_f64();
                let score_b = b.priority * b.time_remaining().as_secs_f64();
                score_a.total_cmp(&score_b)
            });
        match candidate {
            Some(b) => (b.expert, format!("{} has the highest priority*time_remaining", b.expert.as_str())),
            None => (Expert::Cre, "every expert budget is exhausted; defaulting to CRE".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_are_independent_ceilings_not_a_partition() {
        let total: f64 = [Expert::Cre, Expert::Wme, Expert::Mal, Expert::Synthesizer, Expert::Refinement]
            .iter()
            .map(|e| e.shares().0)
            .sum();
        assert!(total > 1.0, "per-expert time shares intentionally overlap");
    }

    #[test]
    fn next_expert_falls_back_to_cre_when_exhausted() {
        let mut budgets = ExpertBudgets::new(Duration::from_secs(60), 10_000);
        for b in budgets.budgets.iter_mut() {
            b.time_used = b.time_budget;
        }
        let (expert, rationale) = budgets.next_expert();
        assert_eq!(expert, Expert::Cre);
        assert!(rationale.contains("exhausted"));
    }
}
