//! Shared Cache Handle
//!
//! Thread-safe, cloneable handle over a single [`CacheStore`].

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;

// == Session Cache ==
/// Cloneable handle to one shared session store.
///
/// Every operation that can change the store, including `get` (which
/// reorders), takes the write lock exactly once and releases it before
/// returning, so a lookup and the move or eviction that follows it can never
/// be split by another caller or by the sweeper. Only diagnostics that leave
/// the store untouched use the read lock.
#[derive(Debug, Clone)]
pub struct SessionCache {
    inner: Arc<RwLock<CacheStore>>,
    /// Fixed at construction, so readable without the lock
    ttl_seconds: u64,
}

impl SessionCache {
    /// Creates a new cache.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `capacity` or `ttl_seconds` is
    /// zero.
    pub fn new(capacity: usize, ttl_seconds: u64) -> Result<Self> {
        Ok(Self::from_store(CacheStore::new(capacity, ttl_seconds)?))
    }

    /// Creates a new cache sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.ttl_seconds)
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            ttl_seconds: store.ttl_seconds(),
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // == Mutating Operations ==
    /// Looks up a session, marking it most recently used.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.write().await.get(key)
    }

    /// Stores or overwrites a session.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.inner.write().await.set(key, value);
    }

    /// Refreshes a session's TTL. Returns false if it was absent.
    pub async fn renew(&self, key: &str) -> bool {
        self.inner.write().await.renew(key)
    }

    /// Removes a session. Returns false if it was absent.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    /// Removes every expired session under a single lock acquisition.
    pub async fn purge_expired(&self) -> usize {
        self.inner.write().await.purge_expired()
    }

    // == Read-Only Operations ==
    /// Checks for a session without touching its recency.
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.contains(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// Returns the TTL the cache was built with, in seconds.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}
