//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the session cache against its invariants and a
//! naive reference model.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

use crate::cache::{CacheStore, SessionCache};

// == Test Configuration ==
const TEST_TTL: u64 = 10;
const T0: i64 = 1_700_000_000;

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Renew { key: String },
    /// Advance the clock by this many seconds and sweep
    Sweep { advance: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Renew { key }),
        1 => (0i64..8).prop_map(|advance| CacheOp::Sweep { advance }),
    ]
}

// == Reference Model ==
/// Straightforward O(n) model: front of the deque is most recent.
#[derive(Debug, Default)]
struct ModelCache {
    order: VecDeque<(String, String, i64)>,
    capacity: usize,
    ttl: i64,
}

impl ModelCache {
    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|(k, _, _)| k == key)
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let pos = self.position(key)?;
        let entry = self.order.remove(pos)?;
        let value = entry.1.clone();
        self.order.push_front(entry);
        Some(value)
    }

    fn set(&mut self, key: String, value: String, now: i64) {
        if let Some(pos) = self.position(&key) {
            self.order.remove(pos);
        } else if self.order.len() >= self.capacity {
            self.order.pop_back();
        }
        self.order.push_front((key, value, now));
    }

    fn delete(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }

    fn renew(&mut self, key: &str, now: i64) {
        if let Some(pos) = self.position(key) {
            self.order[pos].2 = now;
        }
    }

    fn sweep(&mut self, now: i64) -> usize {
        let before = self.order.len();
        let ttl = self.ttl;
        self.order.retain(|(_, _, ts)| now - ts <= ttl);
        before - self.order.len()
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any interleaving of operations leaves the store identical to the
    // reference model, with index and recency list in agreement.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();
        let mut model = ModelCache { capacity, ttl: TEST_TTL as i64, ..Default::default() };
        let mut now = T0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set_at(key.clone(), value.clone(), now);
                    model.set(key, value, now);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.delete(&key);
                }
                CacheOp::Renew { key } => {
                    store.renew_at(&key, now);
                    model.renew(&key, now);
                }
                CacheOp::Sweep { advance } => {
                    now += advance;
                    prop_assert_eq!(store.purge_expired_at(now), model.sweep(now));
                }
            }

            store.assert_consistent();
            prop_assert_eq!(store.keys(), model.keys());
        }
    }

    // For any sequence of sets, the store never holds more than capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        capacity in 1usize..20
    ) {
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();

        for (key, value) in entries {
            store.set(key, value);
            prop_assert!(
                store.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // Filling to capacity C and adding one more distinct key evicts the
    // first key inserted.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::hash_set("[a-z]{1,8}", 2..10),
        new_key in "[0-9]{1,4}"
    ) {
        let keys: Vec<String> = initial_keys.into_iter().collect();
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();

        for key in &keys {
            store.set(key.clone(), String::new());
        }
        store.set(new_key.clone(), String::new());

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains(&keys[0]), "Oldest key should be evicted");
        prop_assert!(store.contains(&new_key));
        for key in keys.iter().skip(1) {
            prop_assert!(store.contains(key), "Key '{}' should survive", key);
        }
    }

    // A get protects the key from the next eviction but not from expiry.
    #[test]
    fn prop_touch_reorders_without_refresh(
        keys in prop::collection::hash_set("[a-z]{1,8}", 2..8),
        touch_index in 0usize..100
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, TEST_TTL).unwrap();

        for (offset, key) in keys.iter().enumerate() {
            store.set_at(key.clone(), String::new(), T0 + offset as i64);
        }

        let touched = keys[touch_index % keys.len()].clone();
        prop_assert!(store.get(&touched).is_some());

        store.set_at("new-key".to_string(), String::new(), T0 + capacity as i64);
        prop_assert!(store.contains(&touched), "Touched key should not be evicted");

        // Its timestamp was left alone by the get, so it expires on schedule
        let touched_pos = keys.iter().position(|k| *k == touched).unwrap() as i64;
        store.purge_expired_at(T0 + touched_pos + TEST_TTL as i64 + 1);
        prop_assert!(!store.contains(&touched), "Touched key should still expire");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent callers through the shared handle never break the
    // structural invariants or the capacity bound.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..60),
        capacity in 1usize..8
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache = SessionCache::new(capacity, TEST_TTL).unwrap();
            let written: HashSet<String> = operations
                .iter()
                .filter_map(|op| match op {
                    CacheOp::Set { value, .. } => Some(value.clone()),
                    _ => None,
                })
                .collect();

            let mut handles = vec![];
            for op in operations {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            cache.set(key, value).await;
                            None
                        }
                        CacheOp::Get { key } => cache.get(&key).await,
                        CacheOp::Delete { key } => {
                            cache.delete(&key).await;
                            None
                        }
                        CacheOp::Renew { key } => {
                            cache.renew(&key).await;
                            None
                        }
                        CacheOp::Sweep { .. } => {
                            cache.purge_expired().await;
                            None
                        }
                    }
                }));
            }

            for handle in handles {
                let read = handle.await.expect("Task should not panic");
                if let Some(value) = read {
                    // Any value read must be one that some caller wrote
                    prop_assert!(written.contains(&value), "Torn read: {:?}", value);
                }
            }

            prop_assert!(cache.len().await <= capacity);
            let stats = cache.stats().await;
            prop_assert_eq!(stats.total_entries, cache.len().await);
            Ok(())
        })?;
    }
}
