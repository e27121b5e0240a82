//! Request input validation.

use axum::http::HeaderMap;

use atlas_domain::page::PageRequest;

use crate::errors::ApiError;

/// Hard ceiling on window sizes; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Extracts the caller's user id from the `x-user-id` header.
///
/// Every domain-scoped endpoint requires this header; a missing or
/// non-positive value is a validation error, not an authentication scheme.
pub fn require_user_id(headers: &HeaderMap) -> Result<i64, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::validation_error("x-user-id header is required and must be a valid user id")
        })?;
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation_error(
            "x-user-id header is required and must be a valid user id",
        )),
    }
}

/// Validates and clamps a window request: zero-sized windows are rejected,
/// oversized ones clamped to [`MAX_PAGE_SIZE`].
pub fn clamp_window(mut window: PageRequest) -> Result<PageRequest, ApiError> {
    if window.first == Some(0) {
        return Err(ApiError::validation_error("first must be positive"));
    }
    if window.last == Some(0) {
        return Err(ApiError::validation_error("last must be positive"));
    }
    window.first = window.first.map(|n| n.min(MAX_PAGE_SIZE));
    window.last = window.last.map(|n| n.min(MAX_PAGE_SIZE));
    Ok(window)
}

/// Parses a comma-separated list of positive domain ids.
pub fn parse_id_list(raw: Option<&str>) -> Result<Option<Vec<i64>>, ApiError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };
    let mut ids = Vec::new();
    for part in raw.split(',') {
        match part.trim().parse::<i64>() {
            Ok(id) if id > 0 => ids.push(id),
            _ => {
                return Err(ApiError::validation_error(format!(
                    "invalid domain id in list: {part:?}"
                )))
            }
        }
    }
    Ok(Some(ids))
}

/// Structural email check, intentionally permissive.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && host.contains('.')
        && !host.starts_with('.')
        && !host.ends_with('.')
        && !email.contains(char::is_whitespace)
}
