use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub timestamp_ms: u64,
    pub event_type: String,
    pub component: String,
    pub details: HashMap<String, Json>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PhaseBudgetSnapshot {
    pub phase: String,
    pub time_budget_ms: u64,
    pub time_used_ms: u64,
    pub iteration_budget: usize,
    pub iterations_used: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UncertaintySnapshot {
    pub phase: String,
    pub epistemic: f64,
    pub aleatoric: f64,
    pub total: f64,
}

/// Chronological record of one solve, owned exclusively by the controller for the
/// duration of the solve and emitted once at the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveTrace {
    pub task_id: String,
    pub start_time_ms: u64,
    pub end_time_ms: Option<u64>,
    pub success: Option<bool>,
    pub final_program: Option<String>,
    pub final_metrics: HashMap<String, Json>,
    pub entries: Vec<TraceEntry>,
    pub budget_per_phase: Vec<PhaseBudgetSnapshot>,
    pub uncertainty_metrics: Vec<UncertaintySnapshot>,
    pub regime: Option<String>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl SolveTrace {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            start_time_ms: now_ms(),
            end_time_ms: None,
            success: None,
            final_program: None,
            final_metrics: HashMap::new(),
            entries: Vec::new(),
            budget_per_phase: Vec::new(),
            uncertainty_metrics: Vec::new(),
            regime: None,
        }
    }

    /// Appends an entry in the order events occur. `details` keys are recorded in
    /// the order given by the caller.
    pub fn record(
        &mut self,
        component: &str,
        event_type: &str,
        details: impl IntoIterator<Item = (&'static str, Json)>,
    ) {
        self.entries.push(TraceEntry {
            timestamp_ms: now_ms(),
            event_type: event_type.to_string(),
            component: component.to_string(),
            details: details.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        });
    }

    pub fn snapshot_budget(&mut self, snapshot: PhaseBudgetSnapshot) {
        self.budget_per_phase.push(snapshot);
    }

    pub fn snapshot_uncertainty(&mut self, snapshot: UncertaintySnapshot) {
        self.uncertainty_metrics.push(snapshot);
    }

    pub fn finalize(&mut self, success: bool, final_program: Option<String>) {
        self.end_time_ms = Some(now_ms());
        self.success = Some(success);
        self.final_program = final_program;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// An aggregate summary across a batch of solves: total/successful/failed counts,
/// success rate, and per-task program/outcome.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub outcomes: Vec<TaskOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: String,
    pub success: bool,
    pub program_source: String,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: Vec<TaskOutcome>) -> Self {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.success).count();
        let failed = total - successful;
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };
        Self {
            total,
            successful,
            failed,
            success_rate,
            outcomes,
        }
    }
}
