//! Error types for the engine crate.

use tdiff_types::{Path, TypeError};

/// Errors that can occur while partitioning two trees.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// An input held a value the data model cannot represent.
    #[error("invalid input value: {0}")]
    Value(#[from] TypeError),

    /// The inputs nest deeper than the configured limit.
    #[error("nesting depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded {
        /// The configured `max_depth`.
        limit: usize,
        /// The container that would have been entered.
        path: Path,
    },

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for engine results.
pub type DiffResult<T> = Result<T, DiffError>;
