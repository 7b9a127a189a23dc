//! Cache Store Module
//!
//! Session cache engine pairing a HashMap index with an index-addressed
//! recency list. Not synchronized; see [`SessionCache`](super::SessionCache)
//! for the shared handle.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::entry::current_timestamp;
use crate::cache::{CacheStats, RecencyList, SessionEntry};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded session storage with LRU eviction and sweep-based TTL expiry.
///
/// Recency and liveness are tracked separately: `get` moves an entry to the
/// front of the recency list but leaves its timestamp alone, while `renew`
/// refreshes the timestamp without reordering. Only `set` does both.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to slot handle in `order`
    index: HashMap<String, usize>,
    /// Entries by recency, newest at the front
    order: RecencyList<SessionEntry>,
    stats: CacheStats,
    capacity: usize,
    ttl_seconds: i64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of live entries
    /// * `ttl_seconds` - Age after the last write or renewal at which the
    ///   sweeper removes an entry
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if either argument is zero.
    pub fn new(capacity: usize, ttl_seconds: u64) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be positive".to_string(),
            ));
        }
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidConfig(
                "ttl must be positive".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        })
    }

    // == Get ==
    /// Looks up a key and marks it most recently used.
    ///
    /// TTL is not consulted: an entry that has outlived its TTL but has not
    /// been swept yet is still returned.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.order.move_to_front(idx);
        self.stats.record_hit();
        self.order.get(idx).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value, stamping it with the current time.
    pub fn set(&mut self, key: String, value: String) {
        self.set_at(key, value, current_timestamp());
    }

    /// Stores a value, stamping it with `now`.
    ///
    /// An existing key is updated in place and moved to the front. A new key
    /// on a full store first evicts the least recently used entry, whatever
    /// its age.
    pub fn set_at(&mut self, key: String, value: String, now: i64) {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(idx) {
                entry.value = value;
                entry.refresh(now);
            }
            self.order.move_to_front(idx);
            return;
        }

        if self.order.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.index.remove(&evicted.key);
                self.stats.record_eviction();
                debug!("Evicted least recently used session");
            }
        }

        let idx = self.order.push_front(SessionEntry::new(key.clone(), value, now));
        self.index.insert(key, idx);
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if the key was present. Deleting an absent key is a
    /// no-op.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(idx) => {
                self.order.remove(idx);
                true
            }
            None => false,
        }
    }

    // == Renew ==
    /// Refreshes the liveness timestamp of a key without reordering it.
    ///
    /// Returns true if the key was present.
    pub fn renew(&mut self, key: &str) -> bool {
        self.renew_at(key, current_timestamp())
    }

    pub fn renew_at(&mut self, key: &str, now: i64) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };

        match self.order.get_mut(idx) {
            Some(entry) => {
                entry.refresh(now);
                true
            }
            None => false,
        }
    }

    // == Purge Expired ==
    /// Removes all entries whose TTL has elapsed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(current_timestamp())
    }

    /// Removes all entries older than the TTL as of `now`, regardless of
    /// their recency position. O(capacity).
    pub fn purge_expired_at(&mut self, now: i64) -> usize {
        let expired: Vec<usize> = self
            .order
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.ttl_seconds))
            .map(|(idx, _)| idx)
            .collect();

        let count = expired.len();

        for idx in expired {
            if let Some(entry) = self.order.remove(idx) {
                self.index.remove(&entry.key);
            }
        }

        self.stats.record_expirations(count);
        count
    }

    // == Contains ==
    /// Checks for a key without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds.unsigned_abs()
    }

    /// Panics if the index and recency list have drifted apart.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.order.len(), "index/order size mismatch");
        assert!(self.order.len() <= self.capacity, "capacity exceeded");
        for (key, &idx) in &self.index {
            let entry = self.order.get(idx).expect("index points at vacant slot");
            assert_eq!(&entry.key, key, "index points at wrong entry");
        }
    }
}
