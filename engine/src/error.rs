//! Error types for the Cockpit compare engine.

use thiserror::Error;

/// All possible errors from the compare engine.
///
/// The CSV tokenizer is total and never produces one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Reconciliation errors
    #[error("cannot serialize attribute '{key}': {reason}")]
    Serialization { key: String, reason: String },

    #[error("invalid attribute record: {0}")]
    InvalidRecord(String),

    // Diff errors
    #[error("malformed diff: left side has {left} lines, right side has {right}")]
    MalformedDiff { left: usize, right: usize },
}

impl Error {
    /// The attribute key that failed to serialize, if this is a serialization error.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Serialization { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
