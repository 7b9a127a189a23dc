//! Auth Module
//!
//! The session check: the sole consumer of the session cache.
//!
//! # Flow
//! - Auth disabled or whitelisted path: pass through
//! - Token from `Authorization` header or `X-Token` cookie, else 400
//! - Token unknown to the cache: 401
//! - Otherwise renew the session and refresh its cookie

pub mod middleware;
pub mod session;

pub use middleware::require_session;
pub use session::{extract_token, Authorization, SessionAuth, TOKEN_COOKIE_NAME};
