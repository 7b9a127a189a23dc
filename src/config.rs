//! Configuration Module
//!
//! Handles loading and validating session cache configuration from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Session cache and session check configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live sessions
    pub capacity: usize,
    /// Seconds a session stays live after its last write or renewal
    pub ttl_seconds: u64,
    /// Seconds between expiry sweeps
    pub sweep_interval_secs: u64,
    /// Whether requests must carry a live session
    pub auth_enabled: bool,
    /// Request paths that skip the session check
    pub auth_whitelist: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SESSION_CAPACITY` - Maximum live sessions (default: 10)
    /// - `SESSION_TTL` - Session TTL in seconds (default: 86400)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 300)
    /// - `AUTH_ENABLED` - Enforce the session check (default: false)
    /// - `AUTH_WHITELIST` - Comma-separated paths exempt from the check
    ///   (default: `/login`)
    ///
    /// Unset variables fall back to their defaults. A variable that is set
    /// but does not parse is an error, as is a resulting config that fails
    /// [`Config::validate`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            capacity: env_parse("SESSION_CAPACITY")?.unwrap_or(defaults.capacity),
            ttl_seconds: env_parse("SESSION_TTL")?.unwrap_or(defaults.ttl_seconds),
            sweep_interval_secs: env_parse("SWEEP_INTERVAL")?
                .unwrap_or(defaults.sweep_interval_secs),
            auth_enabled: env_parse("AUTH_ENABLED")?.unwrap_or(defaults.auth_enabled),
            auth_whitelist: env::var("AUTH_WHITELIST")
                .ok()
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.auth_whitelist),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        if self.ttl_seconds == 0 {
            return Err(CacheError::InvalidConfig(
                "ttl must be positive".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10,
            ttl_seconds: 24 * 60 * 60,
            sweep_interval_secs: 5 * 60,
            auth_enabled: false,
            auth_whitelist: vec!["/login".to_string()],
        }
    }
}

/// Reads an optional variable. `Ok(None)` when unset.
fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{}: {}", name, raw))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(CacheError::InvalidConfig(format!(
            "{}: not valid unicode",
            name
        ))),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
