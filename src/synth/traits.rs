use super::config::SynthesisConfig;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::task::ARCTask;

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub success: bool,
    pub best_program: Option<Ast>,
    pub best_source: String,
    pub score: f64,
    pub iterations: usize,
    pub nodes_explored: usize,
    pub candidates_pruned: usize,
    pub near_misses_kept: usize,
    pub refinement_applied: bool,
    pub refinement_improved: bool,
    /// How many macro/memory candidates were prepended to the initial candidate
    /// pool (§4.5 "Macro retrieval seed"). Set by the caller after construction;
    /// zero when priors/memory retrieval was not consulted.
    pub macros_seeded: usize,
    /// Whether the returned program's source exactly matches one of the seeded
    /// macro/memory candidates, i.e. retrieval alone solved the task with no
    /// further expansion needed.
    pub macro_seed_used: bool,
}

impl SynthesisResult {
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        ast: Ast,
        source: String,
        score: f64,
        iterations: usize,
        nodes_explored: usize,
        candidates_pruned: usize,
        near_misses_kept: usize,
        refinement_applied: bool,
        refinement_improved: bool,
    ) -> Self {
        Self {
            success: true,
            best_program: Some(ast),
            best_source: source,
            score,
            iterations,
            nodes_explored,
            candidates_pruned,
            near_misses_kept,
            refinement_applied,
            refinement_improved,
            macros_seeded: 0,
            macro_seed_used: false,
        }
    }

    pub fn failure(
        ast: Option<Ast>,
        source: String,
        score: f64,
        iterations: usize,
        nodes_explored: usize,
        candidates_pruned: usize,
        near_misses_kept: usize,
    ) -> Self {
        Self {
            success: false,
            best_program: ast,
            best_source: source,
            score,
            iterations,
            nodes_explored,
            candidates_pruned,
            near_misses_kept,
            refinement_applied: false,
            refinement_improved: false,
            macros_seeded: 0,
            macro_seed_used: false,
        }
    }
}

/// Shared entry point for both the beam searcher and the exhaustive oracle.
/// `seeds` carries macro/memory candidates retrieved during PRIORS (§4.5 "Macro
/// retrieval seed") to be prepended to the initial candidate pool; pass `&[]`
/// when retrieval was not consulted.
pub trait Synthesizer {
    fn synthesize(&self, task: &ARCTask, config: &SynthesisConfig, registry: &PrimitiveRegistry, seeds: &[Ast]) -> SynthesisResult;
}
