use crate::dsl::ast::{compose, literal, primitive, Ast, Node};
use crate::dsl::Value;

/// The curated subset of the registry used to seed and expand candidates: those most
/// useful for grid-to-grid synthesis, plus literal-parameterized variants.
pub fn seed_pool() -> Vec<Ast> {
    let mut pool = vec![
        primitive("identity", vec![]),
        primitive("reflect_h", vec![]),
        primitive("reflect_v", vec![]),
        primitive("transpose", vec![]),
        primitive("crop_to_content", vec![]),
        primitive("invert_mask", vec![]),
    ];
    for n in [1, 2, 3] {
        pool.push(primitive("rotate90", vec![literal(Value::Int(n))]));
    }
    for factor in [2, 3, 4] {
        pool.push(primitive("scale", vec![literal(Value::Int(factor))]));
    }
    for n in [2, 3] {
        pool.push(primitive("tile_h", vec![literal(Value::Int(n))]));
        pool.push(primitive("tile_v", vec![literal(Value::Int(n))]));
    }
    for (rows, cols) in [(2, 2), (2, 3), (3, 2)] {
        pool.push(primitive(
            "tile_repeat",
            vec![literal(Value::Int(rows)), literal(Value::Int(cols))],
        ));
    }
    for color in 1..=5 {
        pool.push(primitive("fill_background", vec![literal(Value::Int(color))]));
    }
    pool
}

/// Returns every node of `ast`'s top-level `Compose` (or `[ast]` if it isn't one), in
/// program order -- the shared representation expansion prepends/appends around.
fn operations_of(ast: &Ast) -> Vec<Ast> {
    match ast.get(ast.root()) {
        Node::Compose { operations } => operations.iter().map(|&id| ast.subtree(id)).collect(),
        _ => vec![ast.subtree(ast.root())],
    }
}

/// Expands `ast` by prepending or appending each primitive in `pool`, plus appending
/// `rotate90(n)` for `n in {1,2,3}` regardless of pool contents.
pub fn expand(ast: &Ast, pool: &[Ast]) -> Vec<Ast> {
    let ops = operations_of(ast);
    let mut expansions = Vec::with_capacity(pool.len() * 2 + 3);

    for p in pool {
        let mut prepended = vec![p.subtree(p.root())];
        prepended.extend(ops.iter().map(|o| o.subtree(o.root())));
        expansions.push(compose(prepended));

        let mut appended: Vec<Ast> = ops.iter().map(|o| o.subtree(o.root())).collect();
        appended.push(p.subtree(p.root()));
        expansions.push(compose(appended));
    }

    for n in [1, 2, 3] {
        let mut appended: Vec<Ast> = ops.iter().map(|o| o.subtree(o.root())).collect();
        appended.push(primitive("rotate90", vec![literal(Value::Int(n))]));
        expansions.push(compose(appended));
    }

    expansions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_pool_is_non_empty_and_includes_identity() {
        let pool = seed_pool();
        assert!(!pool.is_empty());
        assert!(pool.iter().any(|a| matches!(a.get(a.root()), Node::Primitive { name, .. } if name == "identity")));
    }

    #[test]
    fn expansion_produces_compose_nodes() {
        let base = primitive("identity", vec![]);
        let pool = vec![primitive("reflect_h", vec![])];
        let expanded = expand(&base, &pool);
        assert!(expanded.iter().all(|a| matches!(a.get(a.root()), Node::Compose { .. })));
        assert!(expanded.len() >= 2);
    }
}
