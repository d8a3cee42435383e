//! Grid & Object Model.
//!
//! A fixed-palette 2D integer grid is the unit of input/output for every DSL program.
//! Connected-component extraction turns a grid into a sequence of `GridObject`s for
//! primitives and heuristics that reason about shapes rather than raw pixels.

pub mod bbox;
pub mod extract;
pub mod grid;
pub mod object;
pub mod relations;

pub use bbox::BoundingBox;
pub use grid::{Color, Grid};
pub use object::{EnhancedObject, GridObject};
