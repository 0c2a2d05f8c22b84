//! Error types for the fuzzy network crate.

use thiserror::Error;

/// Main error type for network construction, propagation and training.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("no alpha-level {0} in this fuzzy number")]
    UndefinedAlphaLevel(f64),

    #[error("division by a value within epsilon of zero")]
    DivisionByNearZero,

    #[error("line search exhausted: step size underflowed without reducing error")]
    LineSearchExhausted,

    #[error("operation `{0}` is not defined for crisp numbers")]
    CrispUnsupported(&'static str),

    #[error("link carries no signal yet")]
    MissingSignal,

    #[error("invalid pattern line: {0}")]
    PatternFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, NetError>;
