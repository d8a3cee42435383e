//! DSL: types, AST, primitive registry, and pretty-printer.

pub mod ast;
pub mod parser;
pub mod primitives;
pub mod printer;
pub mod registry;
pub mod types;
pub mod value;

pub use ast::{Ast, Node, NodeId};
pub use parser::parse_program;
pub use registry::{PrimitiveRegistry, PrimitiveSpec};
pub use types::DslType;
pub use value::Value;
