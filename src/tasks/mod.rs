//! Background Tasks Module
//!
//! # Tasks
//! - TTL Sweeper: Removes expired sessions at a fixed interval until stopped

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle};
