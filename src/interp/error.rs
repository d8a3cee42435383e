use thiserror::Error;

/// Errors raised while evaluating a DSL program. These are always recovered locally
/// by callers (pruned candidate, failed diff) and never surfaced as a top-level
/// `SolverError` -- see `crate::error::SolverError`.
#[derive(Debug, Clone, Error)]
pub enum InterpError {
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    #[error("unknown primitive `{0}`")]
    UnknownPrimitive(String),

    #[error("primitive `{name}` failed: {message}")]
    PrimitiveFailed { name: String, message: String },

    #[error("value of type {0} is not callable")]
    NotCallable(String),

    #[error("closure expects {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("compose pipeline requires a bound `input`")]
    MissingInput,

    #[error("expected a Grid result, got {0}")]
    NotAGrid(String),

    #[error("expected a Bool result for condition, got {0}")]
    NotABool(String),

    #[error("expected a List result, got {0}")]
    NotAList(String),
}
