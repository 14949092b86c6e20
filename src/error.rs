//! Error types for FileForge.

use thiserror::Error;

/// Common error type for FileForge.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant with their message.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness conflict (e.g. duplicate folder name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Upload exceeds the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Blob store failure (upload rejected, network error, ...).
    #[error("blob store error: {0}")]
    BlobStore(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ForgeError {
    fn from(e: sqlx::Error) -> Self {
        ForgeError::Database(e.to_string())
    }
}

/// Result type alias for FileForge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;
