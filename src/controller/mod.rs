//! Meta-Controller: validates a task, classifies its regime, budgets the
//! priors/synthesis/refinement/robustness phases, and assembles the final
//! `SolverResult` and `SolveTrace`.
//!
//! The controller owns the trace for the duration of one solve (see
//! `crate::task`'s lifecycle note) and never exposes a partial one -- `solve`
//! returns only once both the result and the trace are finalized.

pub mod budget;
pub mod difficulty;
pub mod refusal;
pub mod regime;
pub mod scheduler;

use crate::critic::{self, CriticResult};
use crate::dsl::parser::parse_program;
use crate::dsl::printer::pretty_print;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::memory::{decide_gate, extract_features, GateMode, InMemoryStore, MacroLibrary, SolutionMemory};
use crate::robustness::{check_robustness, RobustnessConfig};
use crate::synth::{BeamSynthesizer, SynthesisConfig, SynthesisResult, Synthesizer};
use crate::task::{ARCTask, SolverResult};
use crate::trace::audit::AuditTrace;
use crate::trace::solve_trace::{PhaseBudgetSnapshot, UncertaintySnapshot};
use crate::trace::SolveTrace;
use budget::{Expert, ExpertBudgets};
use refusal::RefusalLimits;
use regime::Regime;
use scheduler::{estimate_uncertainty, Phase};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub total_time_budget_secs: f64,
    pub total_iteration_budget: usize,
    pub use_wme: bool,
    pub use_mal: bool,
    pub enable_refinement: bool,
    pub enable_robustness: bool,
    pub refusal_limits: RefusalLimits,
    pub synthesis: SynthesisConfig,
    pub robustness: RobustnessConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            total_time_budget_secs: 60.0,
            total_iteration_budget: 10_000,
            use_wme: false,
            use_mal: false,
            enable_refinement: true,
            enable_robustness: true,
            refusal_limits: RefusalLimits::default(),
            synthesis: SynthesisConfig::default(),
            robustness: RobustnessConfig::default(),
        }
    }
}

/// A solve's two outputs: the externally-facing result, and the full audit trace
/// kept alongside it for debugging and trace-file export.
pub struct SolveOutcome {
    pub result: SolverResult,
    pub trace: SolveTrace,
}

/// Runs one task through priors, synthesis, refinement (folded into synthesis --
/// see the resolved Open Question in DESIGN.md), and robustness, in that order,
/// updating `memory`/`macros` on success. Refuses immediately, without running
/// any phase, if the task fails preconditions.
pub fn solve(
    task: &ARCTask,
    config: &ControllerConfig,
    registry: &PrimitiveRegistry,
    memory: &mut InMemoryStore,
    macros: &mut MacroLibrary,
) -> SolveOutcome {
    let overall_start = Instant::now();
    let mut trace = SolveTrace::new(task.task_id.clone());

    if let Err(refusal) = refusal::validate(task, &config.refusal_limits) {
        trace.record(
            "controller",
            "refusal",
            [
                ("reason", json!(refusal.reason.code())),
                ("explanation", json!(refusal.explanation)),
            ],
        );
        trace.finalize(false, None);
        let predictions = task.test.iter().map(|p| p.input.to_rows()).collect();
        let result = refusal_result(task.task_id.clone(), &refusal, predictions);
        return SolveOutcome { result, trace };
    }

    let regime_detection = regime::detect_regime(task);
    let difficulty = difficulty::estimate_difficulty(task);
    trace.regime = Some(regime_detection.regime.as_str().to_string());
    trace.record(
        "controller",
        "regime_detected",
        [
            ("regime", json!(regime_detection.regime.as_str())),
            ("confidence", json!(regime_detection.confidence)),
            ("rationale", json!(regime_detection.rationale)),
        ],
    );
    trace.record(
        "controller",
        "difficulty_estimated",
        [
            ("bucket", json!(difficulty.bucket.as_str())),
            ("solvability", json!(difficulty.solvability)),
        ],
    );

    let total_time_budget = Duration::from_secs_f64(config.total_time_budget_secs);
    let mut budgets = ExpertBudgets::new(total_time_budget, config.total_iteration_budget);

    // --- PRIORS --------------------------------------------------------
    let priors_start = Instant::now();
    let mal_tried = config.use_mal;
    let mut synthesis_seeds: Vec<Ast> = Vec::new();
    let mut reused_memory: Option<SynthesisResult> = None;
    if config.use_mal {
        let features = extract_features(task);
        let retrieved: Vec<(f64, SolutionMemory)> = memory
            .all()
            .into_iter()
            .map(|record| (crate::memory::similarity(&features, &record.task_features), record.clone()))
            .filter(|(sim, _)| *sim > 0.0)
            .collect();
        let decision = decide_gate(&features, retrieved);
        trace.record(
            "memory",
            "gate_decision",
            [
                ("mode", json!(decision.mode.as_str())),
                ("confidence", json!(decision.confidence)),
                ("rationale", json!(decision.rationale)),
            ],
        );

        let top_program = decision.considered.first().and_then(|(_, record)| parse_program(&record.program_source));

        // USE_MEMORY short-circuits fresh synthesis, but only once the critic --
        // the sole veto authority -- re-certifies the retrieved program against
        // this task's own training pairs; a stale or merely similar match falls
        // through to seeding below instead.
        if decision.mode == GateMode::UseMemory {
            if let Some(ast) = &top_program {
                let critic = critic::evaluate(ast, task, registry);
                if critic.exact_match_all_pairs() {
                    let source = pretty_print(ast);
                    trace.record("memory", "memory_reused", [("program", json!(source.clone()))]);
                    let reuse_score = crate::synth::scoring::score(ast, &critic);
                    let mut result = SynthesisResult::success(ast.clone(), source, reuse_score, 0, 0, 0, 0, false, false);
                    result.macros_seeded = 1;
                    result.macro_seed_used = true;
                    reused_memory = Some(result);
                }
            }
        }

        if reused_memory.is_none() && matches!(decision.mode, GateMode::UseMemory | GateMode::AdaptMemory | GateMode::Hybrid) {
            synthesis_seeds.extend(
                decision
                    .considered
                    .iter()
                    .filter(|(_, record)| record.success)
                    .take(3)
                    .filter_map(|(_, record)| parse_program(&record.program_source)),
            );
        }

        synthesis_seeds.extend(
            macros
                .suggest_for_context(regime_detection.regime.as_str(), 3)
                .into_iter()
                .filter_map(|entry| parse_program(&entry.pattern_source)),
        );
        synthesis_seeds.sort_by_key(pretty_print);
        synthesis_seeds.dedup_by_key(|ast| pretty_print(ast));

        trace.record("memory", "seeds_prepared", [("count", json!(synthesis_seeds.len()))]);
    }
    budgets.record(Expert::Mal, priors_start.elapsed(), 1);
    trace.snapshot_budget(phase_snapshot(Phase::Priors, &budgets, Expert::Mal));

    // --- SYNTHESIS (beam search, with refinement folded in as post-processing) --
    let synthesis_start = Instant::now();
    let mut synthesis_config = config.synthesis.clone();
    synthesis_config.enable_refinement = config.enable_refinement;
    let synthesis: SynthesisResult = match reused_memory {
        Some(reused) => {
            trace.record("synth", "synthesis_skipped_reused_memory", [("source", json!(reused.best_source.clone()))]);
            reused
        }
        None => {
            let synthesizer = BeamSynthesizer::new();
            synthesizer.synthesize(task, &synthesis_config, registry, &synthesis_seeds)
        }
    };
    let synthesis_elapsed = synthesis_start.elapsed();
    budgets.record(Expert::Cre, synthesis_elapsed, synthesis.iterations);
    budgets.record(Expert::Synthesizer, synthesis_elapsed, synthesis.iterations);
    if synthesis.refinement_applied {
        budgets.record(Expert::Refinement, Duration::ZERO, 0);
    }
    trace.record(
        "synth",
        "synthesis_complete",
        [
            ("success", json!(synthesis.success)),
            ("iterations", json!(synthesis.iterations)),
            ("nodes_explored", json!(synthesis.nodes_explored)),
            ("candidates_pruned", json!(synthesis.candidates_pruned)),
            ("best_source", json!(synthesis.best_source)),
        ],
    );
    trace.snapshot_budget(phase_snapshot(Phase::Synthesis, &budgets, Expert::Cre));
    trace.snapshot_budget(phase_snapshot(Phase::Refinement, &budgets, Expert::Refinement));

    let uncertainty = estimate_uncertainty(synthesis.score.max(0.0) / 100.0, synthesis.near_misses_kept, 0.0);
    trace.snapshot_uncertainty(UncertaintySnapshot {
        phase: Phase::Synthesis.as_str().to_string(),
        epistemic: uncertainty.epistemic,
        aleatoric: uncertainty.aleatoric,
        total: uncertainty.total,
    });
    let reroute = scheduler::decide_reroute(uncertainty, &budgets, config.use_wme, mal_tried);
    trace.record(
        "scheduler",
        "reroute_decision",
        [("reroute", json!(format!("{reroute:?}")))],
    );

    let Some(best_ast) = synthesis.best_program.clone() else {
        trace.finalize(false, None);
        let audit = AuditTrace {
            program_source: synthesis.best_source.clone(),
            synthesis_iterations: synthesis.iterations,
            search_nodes_explored: synthesis.nodes_explored,
            candidates_pruned: synthesis.candidates_pruned,
            near_miss_count: synthesis.near_misses_kept,
            regime: regime_detection.regime.as_str().to_string(),
            runtime_ms: overall_start.elapsed().as_millis() as u64,
            constraints_violated: vec!["no candidate program was produced".to_string()],
            ..Default::default()
        };
        let result = SolverResult {
            task_id: task.task_id.clone(),
            success: false,
            predictions: task.test.iter().map(|p| p.input.to_rows()).collect(),
            audit,
            error_message: Some("synthesis produced no candidate program".to_string()),
        };
        return SolveOutcome { result, trace };
    };

    let final_critic = critic::evaluate(&best_ast, task, registry);

    // --- ROBUSTNESS ------------------------------------------------------
    let robustness_start = Instant::now();
    let robustness_score = if config.enable_robustness && synthesis.success {
        let report = check_robustness(&best_ast, task, registry, &config.robustness);
        trace.record(
            "robustness",
            "robustness_checked",
            [("score", json!(report.score)), ("counterfactuals", json!(report.results.len()))],
        );
        Some(report.score)
    } else {
        None
    };
    budgets.record(Expert::Cre, robustness_start.elapsed(), 0);
    trace.snapshot_budget(phase_snapshot(Phase::Robustness, &budgets, Expert::Cre));

    let source = pretty_print(&best_ast);
    if synthesis.success {
        let key_features = extract_features(task);
        memory.insert(SolutionMemory {
            task_id: task.task_id.clone(),
            program_source: source.clone(),
            task_features: key_features,
            success: true,
            robustness_score: robustness_score.unwrap_or(0.0),
            usage_count: 0,
            timestamp_ms: 0,
        });
        macros.observe(&best_ast, regime_detection.regime.as_str(), true);
    }

    let predictions = task
        .test
        .iter()
        .map(|p| match critic::try_run(&best_ast, &p.input, registry) {
            Ok(grid) => grid.to_rows(),
            Err(_) => p.input.to_rows(),
        })
        .collect();

    let audit = build_audit_trace(&best_ast, &source, &synthesis, &final_critic, &regime_detection, robustness_score, overall_start.elapsed());
    trace.finalize(synthesis.success, Some(source));

    let result = SolverResult {
        task_id: task.task_id.clone(),
        success: synthesis.success,
        predictions,
        audit,
        error_message: if synthesis.success { None } else { final_critic.veto_reason.clone() },
    };

    SolveOutcome { result, trace }
}

/// Builds the `SolverResult` for a refused task -- used both when `refusal::validate`
/// rejects an already-constructed `ARCTask` inside `solve`, and when ingestion itself
/// refuses a task before an `ARCTask` could even be built (see `task::ARCTaskJson::into_task`),
/// in which case `predictions` is empty.
pub fn refusal_result(task_id: impl Into<String>, refusal: &refusal::Refusal, predictions: Vec<Vec<Vec<u8>>>) -> SolverResult {
    let audit = AuditTrace {
        constraints_violated: vec![refusal.reason.code().to_string()],
        regime: Regime::Uncertain.as_str().to_string(),
        ..Default::default()
    };
    SolverResult {
        task_id: task_id.into(),
        success: false,
        predictions,
        audit,
        error_message: Some(refusal.explanation.clone()),
    }
}

fn phase_snapshot(phase: Phase, budgets: &ExpertBudgets, expert: Expert) -> PhaseBudgetSnapshot {
    let b = budgets.get(expert);
    PhaseBudgetSnapshot {
        phase: phase.as_str().to_string(),
        time_budget_ms: b.time_budget.as_millis() as u64,
        time_used_ms: b.time_used.as_millis() as u64,
        iteration_budget: b.iteration_budget,
        iterations_used: b.iterations_used,
    }
}

fn build_audit_trace(
    ast: &crate::dsl::Ast,
    source: &str,
    synthesis: &SynthesisResult,
    critic: &CriticResult,
    regime_detection: &regime::RegimeDetection,
    robustness_score: Option<f64>,
    runtime: Duration,
) -> AuditTrace {
    let diffs_from_expected = critic
        .diffs
        .iter()
        .enumerate()
        .filter_map(|(pair_index, diff)| diff.as_ref().map(|d| d.to_summary(pair_index)))
        .collect();

    AuditTrace {
        program_source: source.to_string(),
        program_depth: ast.depth(),
        program_size: ast.size(),
        constraints_satisfied: critic.invariants.satisfied_names(),
        constraints_violated: critic.invariants.violated_names(),
        diffs_from_expected,
        robustness_score,
        synthesis_iterations: synthesis.iterations,
        search_nodes_explored: synthesis.nodes_explored,
        expansions_generated: synthesis.nodes_explored,
        candidates_pruned: synthesis.candidates_pruned,
        near_miss_count: synthesis.near_misses_kept,
        refinement_steps: if synthesis.refinement_applied { 1 } else { 0 },
        refinement_applied: synthesis.refinement_applied,
        refinement_improved: synthesis.refinement_improved,
        refinement_edits: Vec::new(),
        regime: regime_detection.regime.as_str().to_string(),
        runtime_ms: runtime.as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::{ARCPair, TestPair};

    fn registry() -> PrimitiveRegistry {
        PrimitiveRegistry::standard()
    }

    #[test]
    fn identity_task_certifies_and_predicts() {
        let grid = Grid::from_rows(&[vec![0, 1, 0]]);
        let task = ARCTask::new(
            "identity",
            vec![ARCPair { input: grid.clone(), output: grid.clone() }],
            vec![TestPair { input: grid.clone(), expected_output: None }],
        );
        let mut memory = InMemoryStore::new();
        let mut macros = MacroLibrary::new();
        let outcome = solve(&task, &ControllerConfig::default(), &registry(), &mut memory, &mut macros);
        assert!(outcome.result.success);
        assert!(outcome.result.audit.program_source.contains("identity"));
        assert_eq!(outcome.result.predictions[0], grid.to_rows());
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn use_memory_gate_reuses_a_certified_program_instead_of_resynthesizing() {
        let input = Grid::from_rows(&[vec![1, 2, 3]]);
        let output = Grid::from_rows(&[vec![3, 2, 1]]);
        let task = ARCTask::new(
            "reflect",
            vec![ARCPair { input: input.clone(), output }],
            vec![TestPair { input, expected_output: None }],
        );
        let mut memory = InMemoryStore::new();
        memory.insert(SolutionMemory {
            task_id: "reflect".to_string(),
            program_source: "reflect_h".to_string(),
            task_features: extract_features(&task),
            success: true,
            robustness_score: 1.0,
            usage_count: 0,
            timestamp_ms: 0,
        });
        let mut macros = MacroLibrary::new();
        let mut config = ControllerConfig::default();
        config.use_mal = true;
        let outcome = solve(&task, &config, &registry(), &mut memory, &mut macros);
        assert!(outcome.result.success);
        assert_eq!(outcome.result.audit.synthesis_iterations, 0);
        assert!(outcome.trace.entries.iter().any(|e| e.event_type == "memory_reused"));
    }

    #[test]
    fn adapt_memory_gate_seeds_synthesis_instead_of_ignoring_retrieval() {
        let input = Grid::from_rows(&[vec![1, 2, 3]]);
        let output = Grid::from_rows(&[vec![3, 2, 1]]);
        let task = ARCTask::new(
            "reflect",
            vec![ARCPair { input: input.clone(), output }],
            vec![TestPair { input, expected_output: None }],
        );
        let mut memory = InMemoryStore::new();
        // A moderately-similar record (fewer train pairs) so the gate lands on
        // ADAPT_MEMORY rather than USE_MEMORY, exercising the seeding path.
        let other_input = Grid::from_rows(&[vec![1, 2, 3]]);
        let other_output = Grid::from_rows(&[vec![3, 2, 1]]);
        let other_task = ARCTask::new(
            "other",
            vec![
                ARCPair { input: other_input.clone(), output: other_output.clone() },
                ARCPair { input: other_input, output: other_output },
            ],
            vec![],
        );
        memory.insert(SolutionMemory {
            task_id: "other".to_string(),
            program_source: "reflect_h".to_string(),
            task_features: extract_features(&other_task),
            success: true,
            robustness_score: 1.0,
            usage_count: 0,
            timestamp_ms: 0,
        });
        let mut macros = MacroLibrary::new();
        let mut config = ControllerConfig::default();
        config.use_mal = true;
        let outcome = solve(&task, &config, &registry(), &mut memory, &mut macros);
        assert!(outcome.result.success);
        assert!(outcome.trace.entries.iter().any(|e| e.event_type == "seeds_prepared"));
    }

    #[test]
    fn empty_train_is_refused_without_running_synthesis() {
        let task = ARCTask::new(
            "empty",
            vec![],
            vec![TestPair { input: Grid::from_rows(&[vec![1]]), expected_output: None }],
        );
        let mut memory = InMemoryStore::new();
        let mut macros = MacroLibrary::new();
        let outcome = solve(&task, &ControllerConfig::default(), &registry(), &mut memory, &mut macros);
        assert!(!outcome.result.success);
        assert_eq!(outcome.result.audit.constraints_violated, vec!["MISSING_DATA".to_string()]);
        assert!(outcome.trace.entries.iter().all(|e| e.event_type != "synthesis_complete"));
    }
}
