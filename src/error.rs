//! The crate's error type.

use thiserror::Error;

/// Everything that can go wrong outside of an internal invariant
/// violation (which panics via `debug_assert!` in debug builds and is
/// reported as [`SolverError::Internal`] in release builds).
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at {path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("solution validation failed: {0}")]
    Validation(String),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        SolverError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
