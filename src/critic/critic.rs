use super::diff::{compute_diff, SymbolicDiff};
use super::hints::{compute_refinement_hints, RefinementHint};
use super::invariants::{check_invariants, InvariantReport};
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::interp::{make_program, InterpError};
use crate::task::ARCTask;

#[derive(Debug, Clone)]
pub struct CriticResult {
    pub approved: bool,
    pub veto_reason: Option<String>,
    pub diffs: Vec<Option<SymbolicDiff>>,
    pub invariants: InvariantReport,
    pub hints: Vec<RefinementHint>,
    pub avg_pixel_accuracy: f64,
}

impl CriticResult {
    pub fn exact_match_all_pairs(&self) -> bool {
        !self.diffs.is_empty() && self.diffs.iter().all(|d| matches!(d, Some(diff) if diff.exact_match))
    }
}

/// Evaluates `ast` against every training pair in `task`: compiles once, executes per
/// pair, diffs, checks program-level invariants, and decides `approved` in strict mode
/// (every pair must match exactly). Re-runs the program a second time over the first
/// pair to populate the determinism invariant.
pub fn evaluate(ast: &Ast, task: &ARCTask, registry: &PrimitiveRegistry) -> CriticResult {
    let program = make_program(ast.clone(), registry);

    let mut diffs = Vec::with_capacity(task.train.len());
    let mut exec_failure: Option<String> = None;
    for pair in &task.train {
        match program.run(&pair.input) {
            Ok(predicted) => {
                diffs.push(Some(compute_diff(&pair.input, &predicted, &pair.output, true)));
            }
            Err(e) => {
                exec_failure.get_or_insert_with(|| e.to_string());
                diffs.push(None);
            }
        }
    }

    let determinism_holds = check_determinism(&program, task);

    let inputs: Vec<&crate::grid::Grid> = task.train.iter().map(|p| &p.input).collect();
    let invariants = check_invariants(&inputs, &diffs, determinism_holds);
    let hints = compute_refinement_hints(&diffs);

    let matched = diffs.iter().filter(|d| matches!(d, Some(diff) if diff.exact_match)).count();
    let avg_pixel_accuracy = if diffs.is_empty() {
        0.0
    } else {
        diffs.iter().filter_map(|d| d.as_ref().map(|d| d.pixel_accuracy)).sum::<f64>()
            / diffs.len() as f64
    };

    let approved = exec_failure.is_none()
        && !task.train.is_empty()
        && matched == task.train.len()
        && invariants.violated_names().is_empty();

    let veto_reason = if approved {
        None
    } else if let Some(failure) = exec_failure {
        Some(format!("execution failed: {failure}"))
    } else if !invariants.violated_names().is_empty() {
        Some(format!("invariants violated: {}", invariants.violated_names().join(", ")))
    } else {
        Some(format!("{matched}/{} training pairs matched exactly", task.train.len()))
    };

    CriticResult {
        approved,
        veto_reason,
        diffs,
        invariants,
        hints,
        avg_pixel_accuracy,
    }
}

fn check_determinism(program: &crate::interp::Program<'_>, task: &ARCTask) -> bool {
    let Some(first) = task.train.first() else {
        return true;
    };
    match (program.run(&first.input), program.run(&first.input)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(_), Err(_)) => true,
        _ => false,
    }
}

/// Convenience wrapper for callers (the refinement engine) that only need to know
/// whether a single interpreter error occurred, without the full diff machinery.
pub fn try_run(ast: &Ast, grid: &crate::grid::Grid, registry: &PrimitiveRegistry) -> Result<crate::grid::Grid, InterpError> {
    make_program(ast.clone(), registry).run(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::primitive;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    fn task_with(pairs: Vec<(Grid, Grid)>) -> ARCTask {
        ARCTask::new(
            "t",
            pairs
                .into_iter()
                .map(|(input, output)| ARCPair { input, output })
                .collect(),
            vec![],
        )
    }

    #[test]
    fn identity_program_is_approved_for_identity_task() {
        let task = task_with(vec![(Grid::from_rows(&[vec![1, 2]]), Grid::from_rows(&[vec![1, 2]]))]);
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("identity", vec![]);
        let result = evaluate(&ast, &task, &registry);
        assert!(result.approved);
        assert!(result.exact_match_all_pairs());
        assert_eq!(result.avg_pixel_accuracy, 1.0);
    }

    #[test]
    fn mismatched_program_is_rejected_with_reason() {
        let task = task_with(vec![(Grid::from_rows(&[vec![1, 2]]), Grid::from_rows(&[vec![2, 1]]))]);
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("identity", vec![]);
        let result = evaluate(&ast, &task, &registry);
        assert!(!result.approved);
        assert!(result.veto_reason.is_some());
    }

    #[test]
    fn unknown_primitive_vetoes_via_execution_failure() {
        let task = task_with(vec![(Grid::from_rows(&[vec![1]]), Grid::from_rows(&[vec![1]]))]);
        let registry = PrimitiveRegistry::standard();
        let ast = primitive("not_a_real_primitive", vec![]);
        let result = evaluate(&ast, &task, &registry);
        assert!(!result.approved);
        assert!(result.veto_reason.unwrap().contains("execution failed"));
    }
}
