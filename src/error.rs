use crate::controller::refusal::RefusalReason;
use thiserror::Error;

/// Crate-wide error taxonomy. Interpreter/type-check failures are recovered locally by
/// callers (pruning, scoring) and are never constructed as a top-level `SolverError` --
/// see `crate::interp::error::InterpError` for those.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("task refused: {reason:?} -- {message}")]
    Refusal {
        reason: RefusalReason,
        message: String,
    },

    #[error("synthesis timed out after {elapsed_ms}ms (budget {budget_ms}ms)")]
    SynthesisTimeout { elapsed_ms: u64, budget_ms: u64 },

    #[error("synthesis exhausted {iterations} iterations without certification")]
    SynthesisExhausted { iterations: usize },

    #[error("critic vetoed program `{program}`: {reason}")]
    VerificationVeto { program: String, reason: String },

    #[error("internal error in {component}: {message}")]
    Internal { component: String, message: String },
}

impl SolverError {
    pub fn internal(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            component: component.into(),
            message: message.into(),
        }
    }
}
