use super::ast::{Ast, NodeId};
use super::types::DslType;
use crate::grid::{BoundingBox, Color, Grid, GridObject};
use std::collections::HashMap;
use std::rc::Rc;

/// A runtime value produced and consumed by `interpret`.
#[derive(Debug, Clone)]
pub enum Value {
    Grid(Grid),
    Int(i64),
    Bool(bool),
    Color(Color),
    Object(GridObject),
    Point(i64, i64),
    BBox(BoundingBox),
    ColorMap(HashMap<Color, Color>),
    List(Vec<Value>),
    Closure(Closure),
}

/// `(param_names, body, captured_env)`. `captured_env` is copy-on-write via `Rc`.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Ast,
    pub body_node: NodeId,
    pub captured: Rc<HashMap<String, Value>>,
}

impl Value {
    pub fn type_of(&self) -> DslType {
        match self {
            Value::Grid(_) => DslType::Grid,
            Value::Int(_) => DslType::Int,
            Value::Bool(_) => DslType::Bool,
            Value::Color(_) => DslType::Color,
            Value::Object(_) => DslType::Object,
            Value::Point(_, _) => DslType::Point,
            Value::BBox(_) => DslType::BBox,
            Value::ColorMap(_) => DslType::ColorMap,
            Value::List(items) => {
                let inner = items.first().map(Value::type_of).unwrap_or(DslType::Int);
                DslType::list_of(inner)
            }
            Value::Closure(c) => DslType::function(
                c.params.iter().map(|_| DslType::Int).collect(),
                DslType::Grid,
            ),
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Value::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Color(c) => Some(*c as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            Value::Int(n) if (0..=9).contains(n) => Some(*n as Color),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_color_map(&self) -> Option<&HashMap<Color, Color>> {
        match self {
            Value::ColorMap(m) => Some(m),
            _ => None,
        }
    }
}

/// Infers the DSL type of a literal host value for nodes not given an explicit annotation.
pub fn infer_literal_type(value: &Value) -> DslType {
    value.type_of()
}
