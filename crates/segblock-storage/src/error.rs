//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from rusqlite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (e.g., creating directories).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing store refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Record not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Returns true if the error came from reading or writing the backing store.
    ///
    /// `NotFound` is a caller error; everything else means the persisted
    /// state could not be read or written.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
