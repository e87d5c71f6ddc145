use std::convert::Infallible;

use thiserror::Error;

/// Errors produced while building a [`Value`](crate::Value) tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The source document held something with no counterpart in the value
    /// model (a TOML datetime, a non-finite float).
    #[error("unsupported value kind: {kind}")]
    UnsupportedKind { kind: String },
}

impl TypeError {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedKind { kind: kind.into() }
    }
}

impl From<Infallible> for TypeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
