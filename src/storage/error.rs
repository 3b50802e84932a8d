use thiserror::Error;

/// Errors raised by the in-memory tables
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
