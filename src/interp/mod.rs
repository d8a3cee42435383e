//! The DSL interpreter: executes an `Ast` against an input grid, producing an output
//! grid (or a local `InterpError` that callers turn into a pruning decision).

pub mod env;
pub mod error;
pub mod interpreter;

pub use env::Env;
pub use error::InterpError;

use crate::dsl::{Ast, PrimitiveRegistry};
use crate::grid::Grid;

/// A compiled program: an `Ast` paired with the registry it resolves primitives
/// against. Borrowing the registry (rather than cloning it per program) keeps the
/// common "evaluate thousands of candidates" path allocation-free on that side.
pub struct Program<'r> {
    ast: Ast,
    registry: &'r PrimitiveRegistry,
}

impl<'r> Program<'r> {
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn run(&self, grid: &Grid) -> Result<Grid, InterpError> {
        let env = Env::with_input(grid.clone());
        let value = interpreter::interpret(&self.ast, self.ast.root(), &env, self.registry)?;
        value
            .as_grid()
            .cloned()
            .ok_or_else(|| InterpError::NotAGrid(value.type_of().to_string()))
    }
}

pub fn make_program(ast: Ast, registry: &PrimitiveRegistry) -> Program<'_> {
    Program { ast, registry }
}
