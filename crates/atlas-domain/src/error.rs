//! Domain error types for catalog operations.

use thiserror::Error;

/// Domain-specific errors for access resolution and pagination.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller attempted to write into a domain outside their
    /// accessible set. Carries the offending domain id (`None` when the
    /// request named no domain at all).
    #[error("access denied to domain {}", domain_id.map(|d| d.to_string()).unwrap_or_else(|| "<none>".to_string()))]
    AccessDenied { domain_id: Option<i64> },

    /// A cursor token that could not be decoded into a resume position.
    #[error("invalid cursor: {message}")]
    InvalidCursor { message: String },

    /// Error during access-set resolution.
    #[error("resolver error: {message}")]
    ResolverError { message: String },

    /// A failure surfaced from the underlying record or graph source.
    #[error("storage operation failed: {message}")]
    StorageFailure { message: String },
}

impl DomainError {
    /// Wraps an arbitrary source failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::StorageFailure {
            message: err.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_display_includes_domain_id() {
        let err = DomainError::AccessDenied {
            domain_id: Some(42),
        };
        assert_eq!(err.to_string(), "access denied to domain 42");
    }

    #[test]
    fn test_access_denied_display_without_domain_id() {
        let err = DomainError::AccessDenied { domain_id: None };
        assert_eq!(err.to_string(), "access denied to domain <none>");
    }

    #[test]
    fn test_invalid_cursor_display() {
        let err = DomainError::InvalidCursor {
            message: "not base64".to_string(),
        };
        assert!(err.to_string().contains("invalid cursor"));
    }
}
