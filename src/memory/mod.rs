//! Memory + Macro Library: a solution store keyed by content hash, feature-based
//! retrieval, a frequency-counted macro library, and the gate that picks between
//! reusing, adapting, or ignoring retrieved solutions.

pub mod features;
pub mod gate;
pub mod macros;
pub mod store;

pub use features::{extract_features, similarity, TaskFeatures};
pub use gate::{decide as decide_gate, GateDecision, GateMode};
pub use macros::{MacroEntry, MacroLibrary};
pub use store::{content_key, InMemoryStore, MemoryStore, SolutionMemory};
