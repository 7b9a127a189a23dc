//! Session Check
//!
//! Per-request authentication against the session cache.

use std::collections::HashSet;

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use tracing::{debug, warn};

use crate::cache::SessionCache;
use crate::config::Config;
use crate::error::AuthError;

/// Cookie carrying the session token between requests.
pub const TOKEN_COOKIE_NAME: &str = "X-Token";

/// Outcome of a successful session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The check was skipped (auth disabled or whitelisted path)
    Bypassed,
    /// The request carried this live, now renewed, session token
    Session(String),
}

// == Session Auth ==
/// The session check in front of the gateway's routes.
///
/// Holds a handle to the shared cache, never the cache itself; the cache is
/// created once at startup and passed in.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    cache: SessionCache,
    enabled: bool,
    whitelist: HashSet<String>,
}

impl SessionAuth {
    /// Builds the check from the auth settings in `config`.
    ///
    /// The cookie lifetime always follows the TTL of `cache`, not
    /// `config.ttl_seconds`.
    pub fn new(cache: SessionCache, config: &Config) -> Self {
        Self {
            cache,
            enabled: config.auth_enabled,
            whitelist: config.auth_whitelist.iter().cloned().collect(),
        }
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Authorize ==
    /// Checks a request for a live session and renews it.
    ///
    /// # Errors
    /// - `AuthError::MissingToken` if no token is present
    /// - `AuthError::InvalidToken` if the token is not in the cache
    pub async fn authorize(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Authorization, AuthError> {
        if !self.enabled {
            return Ok(Authorization::Bypassed);
        }

        if self.whitelist.contains(path) {
            debug!("Path {} is whitelisted, skipping session check", path);
            return Ok(Authorization::Bypassed);
        }

        let token = extract_token(headers).ok_or(AuthError::MissingToken)?;

        if self.cache.get(&token).await.is_none() {
            debug!("Rejected request to {}: unknown session", path);
            return Err(AuthError::InvalidToken);
        }

        self.cache.renew(&token).await;
        Ok(Authorization::Session(token))
    }

    // == Session Lifecycle ==
    /// Registers a freshly issued token and returns its cookie.
    ///
    /// The stored value is empty; presence of the key is what matters.
    pub async fn open_session(&self, token: &str) -> Option<HeaderValue> {
        self.cache.set(token, "").await;
        self.session_cookie(token)
    }

    /// Ends a session. Returns false if it was not live.
    pub async fn close_session(&self, token: &str) -> bool {
        self.cache.delete(token).await
    }

    /// Renders the `Set-Cookie` value for a session token.
    pub fn session_cookie(&self, token: &str) -> Option<HeaderValue> {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly",
            TOKEN_COOKIE_NAME,
            token,
            self.cache.ttl_seconds()
        );

        match HeaderValue::from_str(&cookie) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Session token is not a valid cookie value, skipping cookie");
                None
            }
        }
    }
}

// == Token Extraction ==
/// Reads the session token from the `Authorization` header, falling back to
/// the `X-Token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| !token.is_empty())
}
