use crate::dsl::Value;
use std::collections::HashMap;
use std::rc::Rc;

pub const INPUT: &str = "input";

/// A binding environment. Cloning is O(1) (an `Rc` bump); extending with a new
/// binding copies the underlying map only when more than one reference exists
/// (copy-on-write), matching how the DSL's closures capture their defining scope.
#[derive(Debug, Clone, Default)]
pub struct Env(Rc<HashMap<String, Value>>);

impl Env {
    pub fn new() -> Self {
        Env(Rc::new(HashMap::new()))
    }

    pub fn with_input(grid: crate::grid::Grid) -> Self {
        Self::new().bind(INPUT, Value::Grid(grid))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn has_input(&self) -> bool {
        self.0.contains_key(INPUT)
    }

    /// Returns a new environment with `name` bound to `value`.
    pub fn bind(&self, name: impl Into<String>, value: Value) -> Env {
        let mut map = (*self.0).clone();
        map.insert(name.into(), value);
        Env(Rc::new(map))
    }

    pub fn extend(&self, bindings: impl IntoIterator<Item = (String, Value)>) -> Env {
        let mut map = (*self.0).clone();
        map.extend(bindings);
        Env(Rc::new(map))
    }

    pub fn as_map(&self) -> Rc<HashMap<String, Value>> {
        Rc::clone(&self.0)
    }
}
