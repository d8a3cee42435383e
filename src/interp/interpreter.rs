use super::env::{Env, INPUT};
use super::error::InterpError;
use crate::dsl::ast::{Ast, Node, NodeId};
use crate::dsl::{DslType, PrimitiveRegistry, Value};

/// Recursively evaluates `node` of `ast` under `env`, resolving primitives against
/// `registry`.
pub fn interpret(
    ast: &Ast,
    node: NodeId,
    env: &Env,
    registry: &PrimitiveRegistry,
) -> Result<Value, InterpError> {
    match ast.get(node) {
        Node::Literal { value, .. } => Ok(value.clone()),

        Node::Variable { name, .. } => env
            .get(name)
            .cloned()
            .ok_or_else(|| InterpError::UnboundVariable(name.clone())),

        Node::Primitive { name, args } => eval_primitive(ast, name, args, env, registry),

        Node::Compose { operations } => eval_compose(ast, operations, env, registry),

        Node::Lambda { params, body } => {
            let subtree = ast.subtree(*body);
            let body_node = subtree.root();
            Ok(Value::Closure(crate::dsl::value::Closure {
                params: params.iter().map(|(n, _)| n.clone()).collect(),
                body: subtree,
                body_node,
                captured: env.as_map(),
            }))
        }

        Node::Apply { function, args } => {
            let f = interpret(ast, *function, env, registry)?;
            let evaluated_args = args
                .iter()
                .map(|&a| interpret(ast, a, env, registry))
                .collect::<Result<Vec<_>, _>>()?;
            apply_closure(f, evaluated_args, registry)
        }

        Node::Let { name, value, body } => {
            let bound = interpret(ast, *value, env, registry)?;
            let extended = env.bind(name.clone(), bound);
            interpret(ast, *body, &extended, registry)
        }

        Node::Cond {
            condition,
            then_branch,
            else_branch,
        } => {
            let cond = interpret(ast, *condition, env, registry)?;
            match cond.as_bool() {
                Some(true) => interpret(ast, *then_branch, env, registry),
                Some(false) => interpret(ast, *else_branch, env, registry),
                None => Err(InterpError::NotABool(cond.type_of().to_string())),
            }
        }

        Node::Map {
            function,
            list_expr,
        } => {
            let list = interpret(ast, *list_expr, env, registry)?;
            let items = list
                .as_list()
                .ok_or_else(|| InterpError::NotAList(list.type_of().to_string()))?
                .to_vec();
            let mapped = items
                .into_iter()
                .map(|item| apply_node_to_value(ast, *function, item, env, registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(mapped))
        }

        Node::Filter {
            predicate,
            list_expr,
        } => {
            let list = interpret(ast, *list_expr, env, registry)?;
            let items = list
                .as_list()
                .ok_or_else(|| InterpError::NotAList(list.type_of().to_string()))?
                .to_vec();
            let mut kept = Vec::new();
            for item in items {
                let result = apply_node_to_value(ast, *predicate, item.clone(), env, registry)?;
                match result.as_bool() {
                    Some(true) => kept.push(item),
                    Some(false) => {}
                    None => return Err(InterpError::NotABool(result.type_of().to_string())),
                }
            }
            Ok(Value::List(kept))
        }
    }
}

fn eval_primitive(
    ast: &Ast,
    name: &str,
    args: &[NodeId],
    env: &Env,
    registry: &PrimitiveRegistry,
) -> Result<Value, InterpError> {
    let spec = registry
        .get(name)
        .ok_or_else(|| InterpError::UnknownPrimitive(name.to_string()))?;
    let arity = match &spec.signature {
        DslType::Function(params, _) => params.len(),
        _ => args.len(),
    };
    let mut evaluated = args
        .iter()
        .map(|&a| interpret(ast, a, env, registry))
        .collect::<Result<Vec<_>, _>>()?;
    if env.has_input() && evaluated.len() + 1 == arity {
        let input = env.get(INPUT).cloned().expect("has_input checked above");
        evaluated.insert(0, input);
    }
    (spec.implementation)(&evaluated).map_err(|e| InterpError::PrimitiveFailed {
        name: name.to_string(),
        message: e.0,
    })
}

fn eval_compose(
    ast: &Ast,
    operations: &[NodeId],
    env: &Env,
    registry: &PrimitiveRegistry,
) -> Result<Value, InterpError> {
    if !env.has_input() {
        return Err(InterpError::MissingInput);
    }
    let mut current = env.get(INPUT).cloned().expect("has_input checked above");
    for &op in operations {
        let stepped_env = env.bind(INPUT, current.clone());
        current = apply_node_to_value(ast, op, current, &stepped_env, registry)?;
    }
    Ok(current)
}

/// Evaluates `node` as the "function" half of a pipeline step applied to `value`.
/// A `Primitive` node consumes `value` through the normal input-prepending rule;
/// anything else must evaluate to a unary closure.
fn apply_node_to_value(
    ast: &Ast,
    node: NodeId,
    value: Value,
    env: &Env,
    registry: &PrimitiveRegistry,
) -> Result<Value, InterpError> {
    if matches!(ast.get(node), Node::Primitive { .. }) {
        let stepped = env.bind(INPUT, value);
        return interpret(ast, node, &stepped, registry);
    }
    let evaluated = interpret(ast, node, env, registry)?;
    apply_closure(evaluated, vec![value], registry)
}

fn apply_closure(
    callee: Value,
    args: Vec<Value>,
    registry: &PrimitiveRegistry,
) -> Result<Value, InterpError> {
    match callee {
        Value::Closure(closure) => {
            if closure.params.len() != args.len() {
                return Err(InterpError::ArityMismatch {
                    expected: closure.params.len(),
                    actual: args.len(),
                });
            }
            let extended = Env::new().extend(
                closure
                    .captured
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .chain(closure.params.iter().cloned().zip(args)),
            );
            interpret(&closure.body, closure.body_node, &extended, registry)
        }
        other => Err(InterpError::NotCallable(other.type_of().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::{compose, literal, primitive};
    use crate::grid::Grid;

    fn registry() -> PrimitiveRegistry {
        PrimitiveRegistry::standard()
    }

    #[test]
    fn identity_returns_input_unchanged() {
        let ast = primitive("identity", vec![]);
        let g = Grid::from_rows(&[vec![1, 0]]);
        let env = Env::with_input(g.clone());
        let out = interpret(&ast, ast.root(), &env, &registry()).unwrap();
        assert_eq!(out.as_grid().unwrap(), &g);
    }

    #[test]
    fn compose_threads_left_to_right() {
        let ast = compose(vec![
            primitive("reflect_h", vec![]),
            primitive("reflect_h", vec![]),
        ]);
        let g = Grid::from_rows(&[vec![1, 2, 3]]);
        let env = Env::with_input(g.clone());
        let out = interpret(&ast, ast.root(), &env, &registry()).unwrap();
        assert_eq!(out.as_grid().unwrap(), &g);
    }

    #[test]
    fn determinism_holds_across_runs() {
        let ast = primitive("rotate90", vec![literal(Value::Int(1))]);
        let g = Grid::from_rows(&[vec![1, 0], vec![0, 0]]);
        let env = Env::with_input(g);
        let r = registry();
        let a = interpret(&ast, ast.root(), &env, &r).unwrap();
        let b = interpret(&ast, ast.root(), &env, &r).unwrap();
        assert_eq!(a.as_grid(), b.as_grid());
    }

    #[test]
    fn unbound_variable_errors() {
        let ast = crate::dsl::ast::variable("nope");
        let env = Env::new();
        let err = interpret(&ast, ast.root(), &env, &registry()).unwrap_err();
        assert!(matches!(err, InterpError::UnboundVariable(_)));
    }
}
