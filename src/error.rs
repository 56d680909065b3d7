//! Error types for ClientKeeper
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KeeperError
pub type Result<T> = std::result::Result<T, KeeperError>;

/// Unified error type for ClientKeeper operations
#[derive(Debug, Error)]
pub enum KeeperError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    /// Backing store unreachable or rejected the operation
    #[error("Store error: {0}")]
    Store(String),

    #[error("Record not found")]
    NotFound,

    /// Store round trip exceeded the caller's deadline
    #[error("Store timed out after {0} ms")]
    StoreTimeout(u64),

    // -------------------------------------------------------------------------
    // Journal Errors
    // -------------------------------------------------------------------------
    #[error("Journal corruption detected: {0}")]
    JournalCorruption(String),

    // -------------------------------------------------------------------------
    // Query Errors
    // -------------------------------------------------------------------------
    #[error("Query cancelled")]
    Cancelled,

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transport failure talking to a remote server
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for KeeperError {
    fn from(e: bincode::Error) -> Self {
        KeeperError::Serialization(e.to_string())
    }
}

impl KeeperError {
    /// Whether the error was caused by the caller's request rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            KeeperError::InvalidPattern(_)
                | KeeperError::Protocol(_)
                | KeeperError::Validation(_)
                | KeeperError::Json(_)
        )
    }
}
