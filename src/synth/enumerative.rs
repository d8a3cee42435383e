use super::config::SynthesisConfig;
use super::expansion::seed_pool;
use super::scoring::score;
use super::traits::{SynthesisResult, Synthesizer};
use crate::critic::evaluate;
use crate::dsl::ast::{compose, Node};
use crate::dsl::printer::pretty_print;
use crate::dsl::{Ast, PrimitiveRegistry};
use crate::task::ARCTask;

fn operations_of(ast: &Ast) -> Vec<Ast> {
    match ast.get(ast.root()) {
        Node::Compose { operations } => operations.iter().map(|&id| ast.subtree(id)).collect(),
        _ => vec![ast.subtree(ast.root())],
    }
}

fn extend_by_one(level: &[Ast], pool: &[Ast]) -> Vec<Ast> {
    let mut next = Vec::with_capacity(level.len() * pool.len());
    for ast in level {
        let ops = operations_of(ast);
        for p in pool {
            let mut extended: Vec<Ast> = ops.iter().map(|o| o.subtree(o.root())).collect();
            extended.push(p.subtree(p.root()));
            next.push(compose(extended));
        }
    }
    next
}

/// Exhaustively enumerates compositions of the seed pool in increasing length,
/// up to `config.max_depth` primitives per program. Intended as a ground-truth
/// oracle over small pools and shallow depths, not a production search strategy.
pub struct EnumerativeSynthesizer;

impl EnumerativeSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnumerativeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for EnumerativeSynthesizer {
    fn synthesize(&self, task: &ARCTask, config: &SynthesisConfig, registry: &PrimitiveRegistry, seeds: &[Ast]) -> SynthesisResult {
        let mut pool = seed_pool();
        pool.splice(0..0, seeds.iter().cloned());
        let max_length = config.max_depth.max(1);

        let mut nodes_explored = 0usize;
        let mut best: Option<(Ast, String, f64)> = None;

        let mut level = pool.clone();
        for length in 1..=max_length {
            for ast in &level {
                nodes_explored += 1;
                let critic = evaluate(ast, task, registry);
                let s = score(ast, &critic);
                if critic.exact_match_all_pairs() {
                    return SynthesisResult::success(ast.clone(), pretty_print(ast), s, length, nodes_explored, 0, 0, false, false);
                }
                let keep = match &best {
                    Some((_, _, best_score)) => s > *best_score,
                    None => true,
                };
                if keep {
                    best = Some((ast.clone(), pretty_print(ast), s));
                }
            }
            if length < max_length {
                level = extend_by_one(&level, &pool);
            }
        }

        match best {
            Some((ast, source, s)) => SynthesisResult::failure(Some(ast), source, s, max_length, nodes_explored, 0, 0),
            None => SynthesisResult::failure(None, String::new(), f64::NEG_INFINITY, max_length, nodes_explored, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::task::ARCPair;

    #[test]
    fn finds_identity_at_length_one() {
        let grid = Grid::from_rows(&[vec![1, 2], vec![3, 4]]);
        let task = ARCTask::new("t", vec![ARCPair { input: grid.clone(), output: grid }], vec![]);
        let mut config = SynthesisConfig::default();
        config.max_depth = 2;
        let registry = PrimitiveRegistry::standard();
        let result = EnumerativeSynthesizer::new().synthesize(&task, &config, &registry, &[]);
        assert!(result.success);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn finds_reflection_by_exhaustive_search() {
        let input = Grid::from_rows(&[vec![1, 2, 3]]);
        let output = Grid::from_rows(&[vec![3, 2, 1]]);
        let task = ARCTask::new("t", vec![ARCPair { input, output }], vec![]);
        let mut config = SynthesisConfig::default();
        config.max_depth = 1;
        let registry = PrimitiveRegistry::standard();
        let result = EnumerativeSynthesizer::new().synthesize(&task, &config, &registry, &[]);
        assert!(result.success);
        assert!(result.best_source.contains("reflect_h"));
    }
}
