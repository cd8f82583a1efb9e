//! Bearer identity extraction.
//!
//! The bearer token is the caller's user id in plain text. There is no
//! signature, expiry or session lookup.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Authentication failures. All of these map to HTTP 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication required. Please provide Authorization header with Bearer token.")]
    AuthRequired,

    #[error("Invalid authorization header format. Expected: Bearer <user_id>")]
    InvalidAuthScheme,

    #[error("Invalid user ID format. User ID must be a valid integer.")]
    InvalidUserIdToken,
}

/// Read `Authorization: Bearer <user id>` and return the user id.
pub fn extract_user_id(headers: &HeaderMap) -> Result<u64, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::AuthRequired)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            tracing::warn!("Invalid authorization header format");
            AuthError::InvalidAuthScheme
        })?;

    token.parse::<u64>().map_err(|_| {
        tracing::warn!(token = %token, "Invalid user ID format in token");
        AuthError::InvalidUserIdToken
    })
}
