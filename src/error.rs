//! Error types for the session cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while building a session cache.
///
/// Cache operations themselves never fail; absence is reported through
/// `Option`/`bool` returns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity, TTL or sweep interval out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Auth Error Enum ==
/// Rejections produced by the per-request session check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither the Authorization header nor the session cookie was present
    #[error("missing token")]
    MissingToken,

    /// The token is not a live session
    #[error("invalid token")]
    InvalidToken,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the session cache.
pub type Result<T> = std::result::Result<T, CacheError>;
