//! Error types for the autofill engine.

use thiserror::Error;

/// Result type alias using the autofill Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for autofill operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record store did not answer within its query budget
    #[error("Store timeout: {source_name} did not respond within {after_ms}ms")]
    Timeout { source_name: String, after_ms: u64 },

    /// Non-database record store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the error originated in a record store (query failure or timeout).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Timeout { .. } | Error::Store(_)
        )
    }
}
