//! Error type shared by every stage of the pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TopologyError>;

#[derive(Debug, Error)]
pub enum TopologyError {
    /// Malformed, empty or dimension-mismatched input points/distances.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Clique enumeration exceeded the configured simplex cap.
    /// Recoverable by lowering `epsilon_max` or `max_dimension`.
    #[error("complex too large: {count} simplices exceeds cap of {cap}")]
    ComplexTooLarge { count: usize, cap: usize },

    /// The filtered complex violates downward closure or has invalid values.
    #[error("degenerate complex: {0}")]
    DegenerateComplex(String),

    /// Cooperative cancellation was requested.
    #[error("computation cancelled")]
    Cancelled,

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn invalid_input(msg: impl Into<String>) -> TopologyError {
    TopologyError::InvalidInput(msg.into())
}

pub(crate) fn invalid_config(msg: impl Into<String>) -> TopologyError {
    TopologyError::InvalidConfig(msg.into())
}

pub(crate) fn degenerate(msg: impl Into<String>) -> TopologyError {
    TopologyError::DegenerateComplex(msg.into())
}
