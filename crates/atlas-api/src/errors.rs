//! API error responses.
//!
//! Every failure surfaces as a `{ code, message }` JSON body whose code maps
//! to an HTTP status via [`ApiError::into_response`]. Domain and storage
//! errors convert through `From` impls so handlers can use `?` throughout.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::error;

use atlas_domain::DomainError;
use atlas_storage::StorageError;

/// Error codes carried in API responses.
///
/// # Error Code Categories
///
/// ## 400 Bad Request
/// - [`VALIDATION_ERROR`] - Invalid input (format, missing fields, bad window)
/// - [`INVALID_CURSOR`] - Rejected pagination token
///
/// ## 403 Forbidden
/// - [`ACCESS_DENIED`] - Write target outside the caller's accessible domains
///
/// ## 404 Not Found
/// - [`NOT_FOUND`] - Record, domain or user does not exist (or is not
///   visible to the caller)
///
/// ## 500 Internal Server Error
/// - [`INTERNAL_ERROR`] - Unexpected server error
pub mod error_codes {
    /// Generic input validation failure.
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// Pagination cursor token rejected.
    pub const INVALID_CURSOR: &str = "invalid_cursor";
    /// Caller may not write into the named domain.
    pub const ACCESS_DENIED: &str = "access_denied";
    /// Resource absent or invisible to the caller.
    pub const NOT_FOUND: &str = "not_found";
    /// Unexpected internal server error.
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error (400).
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    /// Creates an invalid cursor error (400).
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_CURSOR, message)
    }

    /// Creates an access denied error (403).
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(error_codes::ACCESS_DENIED, message)
    }

    /// Creates a not found error (404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::NOT_FOUND, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use error_codes::*;

        let status = match self.code.as_str() {
            VALIDATION_ERROR | INVALID_CURSOR => StatusCode::BAD_REQUEST,
            ACCESS_DENIED => StatusCode::FORBIDDEN,
            NOT_FOUND => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            // Access denial must identify the denied domain, never be
            // downgraded to an empty result.
            DomainError::AccessDenied { .. } => ApiError::access_denied(err.to_string()),
            DomainError::InvalidCursor { .. } => ApiError::invalid_cursor(err.to_string()),
            DomainError::ResolverError { .. } | DomainError::StorageFailure { .. } => {
                error!("domain error: {err}");
                ApiError::internal_error("internal error")
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::DomainNotFound { .. } | StorageError::UserNotFound { .. } => {
                ApiError::not_found(err.to_string())
            }
            StorageError::InvalidInput { message } => ApiError::validation_error(message.clone()),
            StorageError::Internal { .. } => {
                error!("storage error: {err}");
                ApiError::internal_error("internal error")
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
