//! Symbolic Critic: exact diffing, program-level invariants, and refinement hints.

pub mod critic;
pub mod diff;
pub mod hints;
pub mod invariants;
pub mod task_invariants;

pub use critic::{evaluate, try_run, CriticResult};
pub use diff::{compute_diff, DiffEntry, DiffType, SymbolicDiff};
pub use hints::{compute_refinement_hints, DimensionFix, Pattern, RefinementHint};
pub use invariants::{check_invariants, InvariantReport, InvariantStatus};
pub use task_invariants::{extract_task_invariants, DimensionRatio, TaskInvariants};
