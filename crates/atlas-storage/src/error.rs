//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
///
/// Record lookups by id follow the absent-result convention and return
/// `Option` instead of an error; the not-found variants here cover
/// referential failures on writes (granting into a missing domain, creating
/// under a missing parent).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Domain not found.
    #[error("domain not found: {domain_id}")]
    DomainNotFound { domain_id: i64 },

    /// User not found.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: i64 },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    Internal { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
