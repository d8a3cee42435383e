use super::edits::generate_all;
use super::operation::EditOperation;
use crate::critic::evaluate;
use crate::dsl::printer::pretty_print;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::synth::scoring::score;
use crate::synth::SynthesisConfig;
use crate::task::ARCTask;

/// Candidates generated per refinement iteration, before truncation to the
/// config's refinement budget.
const MAX_EDITS_PER_ITERATION: usize = 10;

#[derive(Debug, Clone)]
pub struct RefinementResult {
    pub success: bool,
    pub final_ast: Ast,
    pub final_source: String,
    pub score: f64,
    pub edits: Vec<EditOperation>,
    pub iterations: usize,
}

/// Hill-climbs `ast` toward critic approval via the edit generators in
/// `edits.rs`. Accepts an edit only if it strictly improves the score --
/// refinement never regresses -- and stops after `max_refinement_iterations`
/// or once no edit improves on the current candidate.
pub fn refine(ast: &Ast, task: &ARCTask, config: &SynthesisConfig, registry: &PrimitiveRegistry) -> RefinementResult {
    let mut current = ast.clone();
    let mut current_critic = evaluate(&current, task, registry);
    let mut current_score = score(&current, &current_critic);
    let mut applied_edits = Vec::new();

    if current_critic.approved {
        return RefinementResult {
            success: true,
            final_source: pretty_print(&current),
            final_ast: current,
            score: current_score,
            edits: applied_edits,
            iterations: 0,
        };
    }

    for iteration in 1..=config.max_refinement_iterations {
        let candidates = generate_all(&current, &current_critic.hints, MAX_EDITS_PER_ITERATION);

        let mut best_improvement: Option<(f64, EditOperation, Ast)> = None;
        for (edit, candidate_ast) in candidates {
            let critic = evaluate(&candidate_ast, task, registry);
            if critic.approved {
                applied_edits.push(edit);
                return RefinementResult {
                    success: true,
                    score: score(&candidate_ast, &critic),
                    final_source: pretty_print(&candidate_ast),
                    final_ast: candidate_ast,
                    edits: applied_edits,
                    iterations: iteration,
                };
            }
            let candidate_score = score(&candidate_ast, &critic);
            if candidate_score > current_score {
                let improves_on_best = match &best_improvement {
                    Some((best_score, ..)) => candidate_score > *best_score,
                    None => true,
                };
                if improves_on_best {
                    best_improvement = Some((candidate_score, edit, candidate_ast));
                }
            }
        }

        match best_improvement {
            Some((new_score, edit, new_ast)) => {
                applied_edits.push(edit);
                current_critic = evaluate(&new_ast, task, registry);
                current = new_ast;
                current_score = new_score;
            }
            None => break,
        }
    }

    RefinementResult {
        success: false,
        final_source: pretty_print(&current),
        final_ast: current,
        score: current_score,
        edits: applied_edits,
        iterations: config.max_refinement_iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::primitive;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    #[test]
    fn already_approved_program_refines_in_zero_iterations() {
        let grid = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let task = ARCTask::new("t", vec![ARCPair { input: grid.clone(), output: grid }], vec![]);
        let registry = PrimitiveRegistry::standard();
        let config = SynthesisConfig::default();
        let ast = primitive("identity", vec![]);
        let result = refine(&ast, &task, &config, &registry);
        assert!(result.success);
        assert_eq!(result.iterations, 0);
        assert!(result.edits.is_empty());
    }

    #[test]
    fn near_miss_rotation_is_fixed_by_swap_primitive() {
        let input = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let output = Grid::from_rows(&[vec![3, 1], vec![4, 2]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let registry = PrimitiveRegistry::standard();
        let config = SynthesisConfig::default();
        let ast = primitive("reflect_h", vec![]);
        let result = refine(&ast, &task, &config, &registry);
        assert!(result.success);
        assert!(result.final_source.contains("rotate90"));
    }

    #[test]
    fn unfixable_program_reports_failure_without_regressing() {
        let input = Grid::from_rows(&[vec![1]]);
        let output = Grid::from_rows(&[vec![9, 9], vec![9, 9], vec![9, 9]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let registry = PrimitiveRegistry::standard();
        let mut config = SynthesisConfig::default();
        config.max_refinement_iterations = 3;
        let ast = primitive("identity", vec![]);
        let result = refine(&ast, &task, &config, &registry);
        assert!(!result.success);
    }
}
