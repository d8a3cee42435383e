use serde::{Deserialize, Serialize};

/// A per-pair summary of a `SymbolicDiff` (see `crate::critic::diff`), trimmed to
/// what the audit trace needs to report without re-exporting the full diff entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SymbolicDiffSummary {
    pub pair_index: usize,
    pub exact_match: bool,
    pub dimension_match: bool,
    pub pixel_accuracy: f64,
    pub diff_count: usize,
}

/// The final audit record attached to every `SolverResult`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditTrace {
    pub program_source: String,
    pub program_depth: usize,
    pub program_size: usize,
    pub constraints_satisfied: Vec<String>,
    pub constraints_violated: Vec<String>,
    pub diffs_from_expected: Vec<SymbolicDiffSummary>,
    pub robustness_score: Option<f64>,
    pub synthesis_iterations: usize,
    pub search_nodes_explored: usize,
    pub expansions_generated: usize,
    pub candidates_pruned: usize,
    pub near_miss_count: usize,
    pub refinement_steps: usize,
    pub refinement_applied: bool,
    pub refinement_improved: bool,
    pub refinement_edits: Vec<String>,
    pub regime: String,
    pub runtime_ms: u64,
}
