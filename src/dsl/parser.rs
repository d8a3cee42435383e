//! Parses the restricted subset of `printer::pretty_print`'s output that the
//! synthesizer, refinement engine, and macro library ever actually produce:
//! a `Compose` of `Primitive`s, each with zero or more integer-literal args
//! (`a >> b(n) >> c`). Used to turn a stored macro pattern or memory record's
//! `program_source` back into an `Ast` so it can seed a fresh search -- see
//! `crate::memory::macros` and `crate::controller`'s PRIORS phase.
//!
//! This is not a general parser for the DSL grammar in `ast.rs`: lambdas,
//! `let`, `cond`, `map`/`filter`, and non-integer literals never appear in a
//! synthesized program, so there is nothing here to read them back.

use super::ast::{compose, literal, primitive, Ast};
use super::value::Value;

/// Parses a pretty-printed program back into an `Ast`, or `None` if it contains
/// anything outside the `Compose`-of-`Primitive(int...)` subset.
pub fn parse_program(source: &str) -> Option<Ast> {
    let ops: Vec<&str> = source.split(" >> ").map(str::trim).collect();
    if ops.is_empty() || ops.iter().any(|op| op.is_empty()) {
        return None;
    }
    let parsed: Option<Vec<Ast>> = ops.iter().map(|op| parse_primitive(op)).collect();
    let parsed = parsed?;
    if parsed.len() == 1 {
        parsed.into_iter().next()
    } else {
        Some(compose(parsed))
    }
}

fn parse_primitive(text: &str) -> Option<Ast> {
    match text.find('(') {
        None => {
            if !text.ends_with(')') && is_identifier(text) {
                Some(primitive(text, vec![]))
            } else {
                None
            }
        }
        Some(open) => {
            if !text.ends_with(')') {
                return None;
            }
            let name = &text[..open];
            if !is_identifier(name) {
                return None;
            }
            let inner = &text[open + 1..text.len() - 1];
            let args = if inner.is_empty() {
                Vec::new()
            } else {
                inner
                    .split(", ")
                    .map(parse_literal)
                    .collect::<Option<Vec<Ast>>>()?
            };
            Some(primitive(name, args))
        }
    }
}

fn parse_literal(text: &str) -> Option<Ast> {
    text.trim().parse::<i64>().ok().map(|n| literal(Value::Int(n)))
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::printer::pretty_print;
    use crate::dsl::ast::{compose as compose_ast, literal as literal_ast, primitive as primitive_ast};

    #[test]
    fn round_trips_a_nullary_primitive() {
        let ast = primitive_ast("identity", vec![]);
        let parsed = parse_program(&pretty_print(&ast)).unwrap();
        assert_eq!(pretty_print(&parsed), "identity");
    }

    #[test]
    fn round_trips_a_parameterized_primitive() {
        let ast = primitive_ast("rotate90", vec![literal_ast(Value::Int(2))]);
        let source = pretty_print(&ast);
        let parsed = parse_program(&source).unwrap();
        assert_eq!(pretty_print(&parsed), source);
    }

    #[test]
    fn round_trips_a_composed_program() {
        let ast = compose_ast(vec![
            primitive_ast("reflect_h", vec![]),
            primitive_ast("scale", vec![literal_ast(Value::Int(2))]),
            primitive_ast("rotate90", vec![literal_ast(Value::Int(1))]),
        ]);
        let source = pretty_print(&ast);
        let parsed = parse_program(&source).unwrap();
        assert_eq!(pretty_print(&parsed), source);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        assert!(parse_program("\u{3bb}(x). x").is_none());
        assert!(parse_program("").is_none());
    }
}
