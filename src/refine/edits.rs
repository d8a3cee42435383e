use super::operation::{EditOperation, EditType};
use crate::critic::RefinementHint;
use crate::dsl::ast::{compose, literal, primitive, Ast, Node, NodeId};
use crate::dsl::printer::pretty_print;
use crate::dsl::Value;
use std::collections::HashMap;

const SWAP_CLASS: &[&str] = &["rotate90", "reflect_h", "reflect_v", "transpose"];
const INSERT_PALETTE: &[&str] = &["identity", "reflect_h", "reflect_v", "transpose"];

/// `Compose`'s top-level operations, or `[root]` if `ast` isn't a `Compose`.
fn operations(ast: &Ast) -> Vec<NodeId> {
    match ast.get(ast.root()) {
        Node::Compose { operations } => operations.clone(),
        _ => vec![ast.root()],
    }
}

fn rebuild_compose(ast: &Ast, operations: &[NodeId]) -> Ast {
    compose(operations.iter().map(|&id| ast.subtree(id)).collect())
}

/// Swaps a compatibility-class primitive (rotate90/reflect_h/reflect_v/transpose) for
/// each of its siblings in the class.
pub fn swap_primitive(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let mut out = Vec::new();
    for (pos, &id) in operations(ast).iter().enumerate() {
        let Node::Primitive { name, .. } = ast.get(id) else { continue };
        if !SWAP_CLASS.contains(&name.as_str()) {
            continue;
        }
        let original_name = name.clone();
        for &candidate in SWAP_CLASS {
            if candidate == original_name {
                continue;
            }
            let replacement = if candidate == "rotate90" {
                primitive(candidate, vec![literal(Value::Int(1))])
            } else {
                primitive(candidate, vec![])
            };
            let mut ops = operations(ast);
            let new_ast = {
                let mut tmp = ast.clone();
                let spliced = tmp.splice(&replacement);
                ops[pos] = spliced;
                rebuild_compose(&tmp, &ops)
            };
            out.push((
                EditOperation {
                    edit_type: EditType::SwapPrimitive,
                    location: pos,
                    original: Some(original_name.clone()),
                    replacement: Some(candidate.to_string()),
                    details: format!("swap {original_name} -> {candidate} at position {pos}"),
                },
                new_ast,
            ));
        }
    }
    out
}

/// For `rotate90(n)` tries `n in {1,2,3}`; for `scale(k)` tries `k in {2,3,4}`.
pub fn tweak_arg(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let mut out = Vec::new();
    for (pos, &id) in operations(ast).iter().enumerate() {
        let Node::Primitive { name, args } = ast.get(id) else { continue };
        let (candidates, original_arg) = match name.as_str() {
            "rotate90" => ([1i64, 2, 3].to_vec(), args.first().copied()),
            "scale" => ([2i64, 3, 4].to_vec(), args.first().copied()),
            _ => continue,
        };
        let Some(arg_id) = original_arg else { continue };
        let original_value = match ast.get(arg_id) {
            Node::Literal { value: Value::Int(n), .. } => *n,
            _ => continue,
        };
        let name = name.clone();
        for candidate in candidates {
            if candidate == original_value {
                continue;
            }
            let replacement = primitive(&name, vec![literal(Value::Int(candidate))]);
            let mut ops = operations(ast);
            let new_ast = {
                let mut tmp = ast.clone();
                let spliced = tmp.splice(&replacement);
                ops[pos] = spliced;
                rebuild_compose(&tmp, &ops)
            };
            out.push((
                EditOperation {
                    edit_type: EditType::TweakArg,
                    location: pos,
                    original: Some(format!("{name}({original_value})")),
                    replacement: Some(format!("{name}({candidate})")),
                    details: format!("tweak {name} arg {original_value} -> {candidate} at position {pos}"),
                },
                new_ast,
            ));
        }
    }
    out
}

/// Prepends or appends one of a small primitive palette.
pub fn insert_primitive(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let mut out = Vec::new();
    let ops = operations(ast);
    for name in INSERT_PALETTE {
        let inserted = primitive(*name, vec![]);

        let mut prepended = vec![inserted.subtree(inserted.root())];
        prepended.extend(ops.iter().map(|&id| ast.subtree(id)));
        out.push((
            EditOperation {
                edit_type: EditType::InsertPrimitive,
                location: 0,
                original: None,
                replacement: Some(name.to_string()),
                details: format!("prepend {name}"),
            },
            compose(prepended),
        ));

        let mut appended: Vec<Ast> = ops.iter().map(|&id| ast.subtree(id)).collect();
        appended.push(inserted.subtree(inserted.root()));
        out.push((
            EditOperation {
                edit_type: EditType::InsertPrimitive,
                location: ops.len(),
                original: None,
                replacement: Some(name.to_string()),
                details: format!("append {name}"),
            },
            compose(appended),
        ));
    }
    out
}

/// Deletes any non-identity primitive from a `Compose` of length >= 2.
pub fn remove_primitive(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let ops = operations(ast);
    if ops.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (pos, &id) in ops.iter().enumerate() {
        let Node::Primitive { name, .. } = ast.get(id) else { continue };
        if name == "identity" {
            continue;
        }
        let mut remaining = ops.clone();
        remaining.remove(pos);
        out.push((
            EditOperation {
                edit_type: EditType::RemovePrimitive,
                location: pos,
                original: Some(name.clone()),
                replacement: None,
                details: format!("remove {name} at position {pos}"),
            },
            rebuild_compose(ast, &remaining),
        ));
    }
    out
}

/// Swaps adjacent operations in a `Compose`.
pub fn swap_order(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let ops = operations(ast);
    if ops.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for pos in 0..ops.len() - 1 {
        let mut swapped = ops.clone();
        swapped.swap(pos, pos + 1);
        out.push((
            EditOperation {
                edit_type: EditType::SwapOrder,
                location: pos,
                original: Some(format!("{pos},{}", pos + 1)),
                replacement: Some(format!("{},{pos}", pos + 1)),
                details: format!("swap operations at positions {pos} and {}", pos + 1),
            },
            rebuild_compose(ast, &swapped),
        ));
    }
    out
}

const TRANSLATE_DELTAS: &[i64] = &[-2, -1, 1, 2];

/// For `translate(dx, dy)`, tries all `(dx+d, dy+d)` for `d in {-2,-1,1,2}`.
pub fn translate_tweak(ast: &Ast) -> Vec<(EditOperation, Ast)> {
    let mut out = Vec::new();
    for (pos, &id) in operations(ast).iter().enumerate() {
        let Node::Primitive { name, args } = ast.get(id) else { continue };
        if name != "translate" || args.len() < 2 {
            continue;
        }
        let (dx, dy) = match (ast.get(args[0]), ast.get(args[1])) {
            (Node::Literal { value: Value::Int(dx), .. }, Node::Literal { value: Value::Int(dy), .. }) => (*dx, *dy),
            _ => continue,
        };
        for &delta in TRANSLATE_DELTAS {
            let (new_dx, new_dy) = (dx + delta, dy + delta);
            let replacement = primitive("translate", vec![literal(Value::Int(new_dx)), literal(Value::Int(new_dy))]);
            let mut ops = operations(ast);
            let new_ast = {
                let mut tmp = ast.clone();
                let spliced = tmp.splice(&replacement);
                ops[pos] = spliced;
                rebuild_compose(&tmp, &ops)
            };
            out.push((
                EditOperation {
                    edit_type: EditType::TranslateTweak,
                    location: pos,
                    original: Some(format!("translate({dx}, {dy})")),
                    replacement: Some(format!("translate({new_dx}, {new_dy})")),
                    details: format!("translate delta {delta:+} at position {pos}"),
                },
                new_ast,
            ));
        }
    }
    out
}

/// For `recolor_map(m)`, maps extra colors to missing colors pairwise; absent any
/// hint pair, tries shifting a destination color by +-1 within 0..9.
pub fn recolor_tweak(ast: &Ast, hints: &[RefinementHint]) -> Vec<(EditOperation, Ast)> {
    let mut out = Vec::new();
    let extras: Vec<u8> = hints.iter().flat_map(|h| h.extra_colors.iter().copied()).collect();
    let missing: Vec<u8> = hints.iter().flat_map(|h| h.missing_colors.iter().copied()).collect();

    for (pos, &id) in operations(ast).iter().enumerate() {
        let Node::Primitive { name, args } = ast.get(id) else { continue };
        if name != "recolor_map" || args.is_empty() {
            continue;
        }
        let Node::Literal { value: Value::ColorMap(existing), .. } = ast.get(args[0]) else { continue };

        let mut candidate_maps: Vec<HashMap<u8, u8>> = Vec::new();
        if !extras.is_empty() && !missing.is_empty() {
            let mut extended = existing.clone();
            for (&e, &m) in extras.iter().zip(missing.iter()) {
                extended.insert(e, m);
            }
            candidate_maps.push(extended);
        } else {
            for (&k, &v) in existing.iter() {
                for delta in [-1i64, 1] {
                    let shifted = (v as i64 + delta).clamp(0, 9) as u8;
                    if shifted == v {
                        continue;
                    }
                    let mut extended = existing.clone();
                    extended.insert(k, shifted);
                    candidate_maps.push(extended);
                }
            }
        }

        for map in candidate_maps {
            let replacement = primitive("recolor_map", vec![literal(Value::ColorMap(map.clone()))]);
            let mut ops = operations(ast);
            let new_ast = {
                let mut tmp = ast.clone();
                let spliced = tmp.splice(&replacement);
                ops[pos] = spliced;
                rebuild_compose(&tmp, &ops)
            };
            out.push((
                EditOperation {
                    edit_type: EditType::RecolorTweak,
                    location: pos,
                    original: Some(pretty_print(&ast.subtree(id))),
                    replacement: Some(pretty_print(&new_ast)),
                    details: format!("recolor_map tweak at position {pos}"),
                },
                new_ast,
            ));
        }
    }
    out
}

/// Every generator, bounded to `max_edits` total candidates.
pub fn generate_all(ast: &Ast, hints: &[RefinementHint], max_edits: usize) -> Vec<(EditOperation, Ast)> {
    let mut edits = Vec::new();
    edits.extend(swap_primitive(ast));
    edits.extend(tweak_arg(ast));
    edits.extend(insert_primitive(ast));
    edits.extend(remove_primitive(ast));
    edits.extend(swap_order(ast));
    edits.extend(translate_tweak(ast));
    edits.extend(recolor_tweak(ast, hints));
    edits.truncate(max_edits);
    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_primitive_proposes_siblings() {
        let ast = primitive("reflect_h", vec![]);
        let edits = swap_primitive(&ast);
        assert_eq!(edits.len(), SWAP_CLASS.len() - 1);
    }

    #[test]
    fn tweak_arg_skips_the_current_value() {
        let ast = primitive("rotate90", vec![literal(Value::Int(1))]);
        let edits = tweak_arg(&ast);
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|(op, _)| op.replacement.as_deref() != Some("rotate90(1)")));
    }

    #[test]
    fn remove_primitive_requires_compose_of_at_least_two() {
        let ast = primitive("identity", vec![]);
        assert!(remove_primitive(&ast).is_empty());
        let multi = compose(vec![primitive("identity", vec![]), primitive("reflect_h", vec![])]);
        assert_eq!(remove_primitive(&multi).len(), 1);
    }

    #[test]
    fn swap_order_swaps_adjacent_pairs() {
        let ast = compose(vec![
            primitive("reflect_h", vec![]),
            primitive("reflect_v", vec![]),
            primitive("transpose", vec![]),
        ]);
        assert_eq!(swap_order(&ast).len(), 2);
    }
}
