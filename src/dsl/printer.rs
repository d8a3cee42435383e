use super::ast::{Ast, Node, NodeId};
use super::value::Value;
use crate::grid::Color;
use std::fmt::Write;

/// Renders `Compose([a,b,c])` as `a >> b >> c`; primitives as `name` or
/// `name(arg1, arg2, ...)`. This is the canonical form used for macro keys, audit
/// traces, and refinement-edit diagnostics -- it must round-trip node identity, not
/// just look nice.
pub fn pretty_print(ast: &Ast) -> String {
    print_node(ast, ast.root())
}

fn print_node(ast: &Ast, id: NodeId) -> String {
    match ast.get(id) {
        Node::Literal { value, .. } => print_value(value),
        Node::Variable { name, .. } => name.clone(),
        Node::Primitive { name, args } => {
            if args.is_empty() {
                name.clone()
            } else {
                let rendered: Vec<String> = args.iter().map(|&a| print_node(ast, a)).collect();
                format!("{}({})", name, rendered.join(", "))
            }
        }
        Node::Compose { operations } => operations
            .iter()
            .map(|&op| print_node(ast, op))
            .collect::<Vec<_>>()
            .join(" >> "),
        Node::Lambda { params, body } => {
            let names: Vec<&str> = params.iter().map(|(n, _)| n.as_str()).collect();
            format!("\u{3bb}({}). {}", names.join(", "), print_node(ast, *body))
        }
        Node::Apply { function, args } => {
            let rendered: Vec<String> = args.iter().map(|&a| print_node(ast, a)).collect();
            format!("({})({})", print_node(ast, *function), rendered.join(", "))
        }
        Node::Let { name, value, body } => format!(
            "let {} = {}\n  in {}",
            name,
            print_node(ast, *value),
            print_node(ast, *body)
        ),
        Node::Cond {
            condition,
            then_branch,
            else_branch,
        } => format!(
            "if {}\n  then {}\n  else {}",
            print_node(ast, *condition),
            print_node(ast, *then_branch),
            print_node(ast, *else_branch)
        ),
        Node::Map {
            function,
            list_expr,
        } => format!("map({}, {})", print_node(ast, *function), print_node(ast, *list_expr)),
        Node::Filter {
            predicate,
            list_expr,
        } => format!(
            "filter({}, {})",
            print_node(ast, *predicate),
            print_node(ast, *list_expr)
        ),
    }
}

fn print_value(value: &Value) -> String {
    match value {
        Value::Grid(g) => {
            let rows: Vec<String> = g
                .rows()
                .map(|row| {
                    row.iter()
                        .map(Color::to_string)
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            format!("[{}]", rows.join(";"))
        }
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Color(c) => c.to_string(),
        Value::Point(x, y) => format!("({x}, {y})"),
        Value::BBox(b) => format!("bbox({},{},{},{})", b.min_row, b.min_col, b.max_row, b.max_col),
        Value::ColorMap(m) => {
            let mut pairs: Vec<(u8, u8)> = m.iter().map(|(&k, &v)| (k, v)).collect();
            pairs.sort_unstable();
            let body: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}->{v}")).collect();
            format!("{{{}}}", body.join(", "))
        }
        Value::List(items) => {
            let body: Vec<String> = items.iter().map(print_value).collect();
            format!("[{}]", body.join(", "))
        }
        Value::Object(_) => "<object>".to_string(),
        Value::Closure(_) => "<closure>".to_string(),
    }
}

/// An indented outline of node kinds, used for debugging rather than round-tripping.
pub fn debug_outline(ast: &Ast) -> String {
    let mut out = String::new();
    outline_rec(ast, ast.root(), 0, &mut out);
    out
}

fn outline_rec(ast: &Ast, id: NodeId, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let label = match ast.get(id) {
        Node::Literal { .. } => "Literal".to_string(),
        Node::Variable { name, .. } => format!("Variable({name})"),
        Node::Primitive { name, .. } => format!("Primitive({name})"),
        Node::Compose { .. } => "Compose".to_string(),
        Node::Lambda { .. } => "Lambda".to_string(),
        Node::Apply { .. } => "Apply".to_string(),
        Node::Let { name, .. } => format!("Let({name})"),
        Node::Cond { .. } => "Cond".to_string(),
        Node::Map { .. } => "Map".to_string(),
        Node::Filter { .. } => "Filter".to_string(),
    };
    let _ = writeln!(out, "{pad}{label}");
    for child in ast.children(id) {
        outline_rec(ast, child, indent + 1, out);
    }
}

/// Each node alongside its inferred DSL type, when available. Used in audit/debug
/// output, not for round-tripping.
pub fn type_annotated(ast: &Ast) -> String {
    let mut out = String::new();
    type_rec(ast, ast.root(), 0, &mut out);
    out
}

fn type_rec(ast: &Ast, id: NodeId, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let ty = match ast.get(id) {
        Node::Literal { inferred_type, .. } | Node::Variable { inferred_type, .. } => {
            inferred_type.as_ref().map(|t| t.to_string())
        }
        _ => None,
    };
    let rendered = print_node(ast, id);
    match ty {
        Some(t) => {
            let _ = writeln!(out, "{pad}{rendered} : {t}");
        }
        None => {
            let _ = writeln!(out, "{pad}{rendered}");
        }
    }
    for child in ast.children(id) {
        type_rec(ast, child, indent + 1, out);
    }
}
