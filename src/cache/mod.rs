//! Cache Module
//!
//! In-memory session cache with LRU eviction and sweep-based TTL expiry.

mod entry;
mod handle;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp, SessionEntry};
pub use handle::SessionCache;
pub use order::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
