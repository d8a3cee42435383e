//! Refinement: iterative local-edit search over near-miss programs, used as a
//! post-processing pass after the main synthesis loop.

pub mod edits;
pub mod engine;
pub mod operation;

pub use edits::generate_all;
pub use engine::{refine, RefinementResult};
pub use operation::{EditOperation, EditType};
