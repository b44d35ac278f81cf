//! Error types for solrbuddy
//!
//! One error enum covers the whole repository stack. Not-found outcomes are
//! never errors: point lookups return `Option`, collection queries return an
//! empty sequence.

use thiserror::Error;

/// Main error type for repository and backend operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Precondition failures detected before any network I/O
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backend unreachable, connection reset, or similar transport faults
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Fault reported by the search engine itself
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    /// Malformed query template or missing template argument
    #[error("Query template error: {0}")]
    Template(String),

    /// Configuration errors, including unknown named queries
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RepositoryError {
    /// True for failures that never reached the engine or got no answer from it
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RepositoryError::Transport(_) | RepositoryError::Timeout { .. }
        )
    }

    /// True for faults the engine reported
    pub fn is_backend(&self) -> bool {
        matches!(self, RepositoryError::Backend { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RepositoryError::Validation(_))
    }
}

/// Result type alias for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;
