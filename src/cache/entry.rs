//! Session Entry Module
//!
//! Defines the unit of storage held by the session cache.

// == Session Entry ==
/// A single cached session: the token, its value, and when it was last
/// written or renewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// The session token
    pub key: String,
    /// The stored value (conventionally empty for session tokens)
    pub value: String,
    /// Last write or renewal (Unix seconds)
    pub last_timestamp: i64,
}

impl SessionEntry {
    // == Constructor ==
    /// Creates a new entry stamped at `now`.
    pub fn new(key: String, value: String, now: i64) -> Self {
        Self {
            key,
            value,
            last_timestamp: now,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl_seconds` as of `now`.
    ///
    /// Boundary condition: the entry is expired only once strictly more than
    /// `ttl_seconds` have passed since the last write or renewal. An entry
    /// exactly `ttl_seconds` old is still live.
    pub fn is_expired(&self, now: i64, ttl_seconds: i64) -> bool {
        now.saturating_sub(self.last_timestamp) > ttl_seconds
    }

    // == Refresh ==
    /// Moves the liveness timestamp forward to `now`.
    pub fn refresh(&mut self, now: i64) {
        self.last_timestamp = now;
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
