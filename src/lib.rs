//! Session Cache - bounded in-memory store for authentication sessions
//!
//! Provides LRU eviction at a fixed capacity, TTL expiry enforced by a
//! stoppable background sweeper, and the per-request session check that
//! consumes it.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use auth::{require_session, SessionAuth};
pub use cache::SessionCache;
pub use config::Config;
pub use error::{AuthError, CacheError};
pub use tasks::{spawn_sweeper, SweeperHandle};
