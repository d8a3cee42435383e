use super::config::SynthesisConfig;
use super::constraint_set::ConstraintSet;
use super::expansion::{expand, seed_pool};
use super::pruning::prune_reason;
use super::scoring::{score, selection_score};
use super::traits::{SynthesisResult, Synthesizer};
use crate::critic::{evaluate, try_run};
use crate::dsl::printer::pretty_print;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::robustness::quick_robustness_score;
use crate::task::ARCTask;
use std::time::Instant;

const QUICK_ROBUSTNESS_SEED: u64 = 1729;

#[derive(Debug, Clone)]
struct Candidate {
    ast: Ast,
    score: f64,
    selection_score: f64,
    source: String,
    exact: bool,
}

fn make_candidate(ast: Ast, task: &ARCTask, config: &SynthesisConfig, registry: &PrimitiveRegistry) -> Candidate {
    let critic = evaluate(&ast, task, registry);
    let score = score(&ast, &critic);
    let source = pretty_print(&ast);
    let exact = critic.exact_match_all_pairs();
    let quick_robustness = if config.use_wme {
        quick_robustness_score(&ast, task, registry, QUICK_ROBUSTNESS_SEED)
    } else {
        0.0
    };
    let selection_score = selection_score(score, &ast, config, quick_robustness);
    Candidate { ast, score, selection_score, source, exact }
}

/// Deterministic tie-break: score descending, size ascending, source ascending.
/// Used for exact-match detection, near-miss thresholding, and the final
/// best-effort pick -- never for beam narrowing, which uses `cmp_by_selection`.
fn cmp_candidates(a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.ast.size().cmp(&b.ast.size()))
        .then_with(|| a.source.cmp(&b.source))
}

/// Soft re-ranking used only to narrow the beam (§4.5 "Hard-veto selection"):
/// `selection_score` descending, with the same size/source tie-break as
/// `cmp_candidates` so truncation stays deterministic.
fn cmp_by_selection(a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
    b.selection_score
        .total_cmp(&a.selection_score)
        .then_with(|| a.ast.size().cmp(&b.ast.size()))
        .then_with(|| a.source.cmp(&b.source))
}

fn dedup_sorted_by_source(candidates: &mut Vec<Candidate>) {
    candidates.dedup_by(|a, b| a.source == b.source);
}

fn is_pruned(ast: &Ast, task: &ARCTask, config: &SynthesisConfig, constraints: Option<&ConstraintSet>, registry: &PrimitiveRegistry) -> bool {
    for pair in &task.train {
        match try_run(ast, &pair.input, registry) {
            Err(_) => return true,
            Ok(predicted) => {
                if prune_reason(config, &pair.input, &predicted, &pair.output, constraints).is_some() {
                    return true;
                }
            }
        }
    }
    false
}

fn collect_near_misses(near_misses: &mut Vec<Candidate>, candidates: &[Candidate], config: &SynthesisConfig) {
    for c in candidates {
        if !c.exact && c.score >= config.near_miss_threshold {
            near_misses.push(c.clone());
        }
    }
    near_misses.sort_by(cmp_candidates);
    dedup_sorted_by_source(near_misses);
    near_misses.truncate(config.top_k_near_miss.max(1));
}

/// Beam search over `Ast` compositions, seeded from a curated primitive pool and
/// expanded one primitive at a time, pruned by the critic's hard constraints at
/// every step. Falls back to local-edit refinement on the best near-misses once
/// the beam stalls, per the resolved Open Question that refinement runs only as
/// a post-processing pass, never interleaved with the main loop.
pub struct BeamSynthesizer;

impl BeamSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BeamSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for BeamSynthesizer {
    fn synthesize(&self, task: &ARCTask, config: &SynthesisConfig, registry: &PrimitiveRegistry, seeds: &[Ast]) -> SynthesisResult {
        let start = Instant::now();
        let constraint_set = config.use_constraint_set.then(|| ConstraintSet::from_task(task));
        let mut pool = seed_pool();
        pool.splice(0..0, seeds.iter().cloned());
        let macros_seeded = seeds.len();

        let mut nodes_explored = 0usize;
        let mut candidates_pruned = 0usize;
        let mut near_misses: Vec<Candidate> = Vec::new();

        let initial: Vec<Candidate> = pool.iter().map(|ast| make_candidate(ast.clone(), task, config, registry)).collect();
        nodes_explored += initial.len();

        if let Some(winner) = initial.iter().find(|c| c.exact) {
            let mut result = SynthesisResult::success(
                winner.ast.clone(),
                winner.source.clone(),
                winner.score,
                1,
                nodes_explored,
                candidates_pruned,
                near_misses.len(),
                false,
                false,
            );
            result.macros_seeded = macros_seeded;
            result.macro_seed_used = macros_seeded > 0 && seeds.iter().any(|s| pretty_print(s) == winner.source);
            return result;
        }

        let mut beam: Vec<Candidate> = initial.into_iter().filter(|c| c.score >= 0.0).collect();
        beam.sort_by(cmp_by_selection);
        beam.truncate(config.beam_width);
        collect_near_misses(&mut near_misses, &beam, config);

        let mut iterations_used = 0usize;
        for iteration in 1..=config.max_iterations {
            iterations_used = iteration;
            if start.elapsed().as_secs_f64() >= config.timeout_seconds {
                break;
            }

            let mut generated: Vec<Candidate> = Vec::new();
            for candidate in &beam {
                if candidate.ast.depth() >= config.max_depth {
                    continue;
                }
                let expansions = expand(&candidate.ast, &pool);
                for expanded in expansions {
                    nodes_explored += 1;
                    if is_pruned(&expanded, task, config, constraint_set.as_ref(), registry) {
                        candidates_pruned += 1;
                        continue;
                    }
                    let cand = make_candidate(expanded, task, config, registry);
                    if cand.exact {
                        let mut result = SynthesisResult::success(
                            cand.ast,
                            cand.source.clone(),
                            cand.score,
                            iteration,
                            nodes_explored,
                            candidates_pruned,
                            near_misses.len(),
                            false,
                            false,
                        );
                        result.macros_seeded = macros_seeded;
                        result.macro_seed_used = macros_seeded > 0 && seeds.iter().any(|s| pretty_print(s) == cand.source);
                        return result;
                    }
                    generated.push(cand);
                }
            }

            collect_near_misses(&mut near_misses, &generated, config);
            if generated.is_empty() {
                break;
            }

            beam.extend(generated);
            beam.sort_by(cmp_by_selection);
            dedup_sorted_by_source(&mut beam);
            beam.truncate(config.beam_width);
        }

        if config.enable_refinement {
            let mut ordered_near_misses = near_misses.clone();
            ordered_near_misses.sort_by(cmp_candidates);
            for near_miss in ordered_near_misses.iter().take(config.top_k_near_miss) {
                let refined = crate::refine::refine(&near_miss.ast, task, config, registry);
                if refined.success {
                    let mut result = SynthesisResult::success(
                        refined.final_ast,
                        refined.final_source,
                        refined.score,
                        iterations_used,
                        nodes_explored,
                        candidates_pruned,
                        near_misses.len(),
                        true,
                        true,
                    );
                    result.macros_seeded = macros_seeded;
                    return result;
                }
            }
        }

        let best = beam.iter().min_by(|a, b| cmp_candidates(a, b));
        let mut result = match best {
            Some(best) => SynthesisResult::failure(
                Some(best.ast.clone()),
                best.source.clone(),
                best.score,
                iterations_used,
                nodes_explored,
                candidates_pruned,
                near_misses.len(),
            ),
            None => SynthesisResult::failure(None, String::new(), f64::NEG_INFINITY, iterations_used, nodes_explored, candidates_pruned, near_misses.len()),
        };
        result.macros_seeded = macros_seeded;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    fn registry() -> PrimitiveRegistry {
        PrimitiveRegistry::standard()
    }

    #[test]
    fn finds_identity_immediately() {
        let grid = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let task = ARCTask::new("t", vec![ARCPair { input: grid.clone(), output: grid }], vec![]);
        let config = SynthesisConfig::default();
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[]);
        assert!(result.success);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn finds_horizontal_reflection() {
        let input = Grid::from_rows(&[vec![1, 2, 3]]);
        let output = Grid::from_rows(&[vec![3, 2, 1]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let config = SynthesisConfig::default();
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[]);
        assert!(result.success);
        assert!(result.best_source.contains("reflect_h"));
    }

    #[test]
    fn finds_90_degree_rotation_via_expansion() {
        let input = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let output = Grid::from_rows(&[vec![3, 1], vec![4, 2]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let config = SynthesisConfig::default();
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[]);
        assert!(result.success);
        assert!(result.best_source.contains("rotate90"));
    }

    #[test]
    fn unsolvable_task_returns_failure_with_best_effort() {
        let input = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let output = Grid::from_rows(&[vec![9, 9, 9], vec![9, 9, 9], vec![9, 9, 9]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let mut config = SynthesisConfig::default();
        config.max_iterations = 5;
        config.enable_refinement = false;
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[]);
        assert!(!result.success);
    }

    #[test]
    fn a_seeded_macro_that_solves_the_task_is_reported_as_used() {
        let input = Grid::from_rows(&[vec![1, 2, 3]]);
        let output = Grid::from_rows(&[vec![3, 2, 1]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let config = SynthesisConfig::default();
        let seed = crate::dsl::ast::primitive("reflect_h", vec![]);
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[seed]);
        assert!(result.success);
        assert_eq!(result.macros_seeded, 1);
        assert!(result.macro_seed_used);
    }

    #[test]
    fn an_irrelevant_seed_is_counted_but_does_not_block_the_search() {
        let grid = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let task = ARCTask::new("t", vec![ARCPair { input: grid.clone(), output: grid }], vec![]);
        let config = SynthesisConfig::default();
        let seed = crate::dsl::ast::primitive("rotate90", vec![crate::dsl::ast::literal(crate::dsl::Value::Int(1))]);
        let result = BeamSynthesizer::new().synthesize(&task, &config, &registry(), &[seed]);
        assert!(result.success);
        assert_eq!(result.macros_seeded, 1);
        assert!(!result.macro_seed_used);
    }
}
