//! Error handling utilities shared across the crate.

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = BpeError> = std::result::Result<T, E>;

/// Domain-specific error describing invalid configuration or corpus input.
#[derive(Debug, Error)]
pub enum BpeError {
    /// Merge configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A `word:freq` corpus entry could not be parsed.
    #[error("invalid corpus item {input:?}: {reason}")]
    InvalidCorpusItem {
        /// Raw text supplied by the caller.
        input: String,
        /// Human readable description of the problem.
        reason: String,
    },
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BpeError {
    /// Helper constructor for corpus parsing failures.
    pub fn corpus_item(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCorpusItem {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
