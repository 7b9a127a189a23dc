//! TTL Sweeper Task
//!
//! Background task that periodically removes expired sessions.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SessionCache;
use crate::error::{CacheError, Result};

// == Sweeper Handle ==
/// Owner of a running sweeper task.
///
/// Call [`SweeperHandle::stop`] during shutdown. Dropping the handle also
/// closes the stop channel, which ends the task at its next wake-up.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        match self.task.await {
            Ok(()) => info!("TTL sweeper stopped"),
            Err(err) if err.is_panic() => warn!("TTL sweeper had panicked: {}", err),
            Err(err) => warn!("TTL sweeper did not stop cleanly: {}", err),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that sweeps expired sessions every `interval`.
///
/// Each sweep holds the cache's write lock for one pass over all entries,
/// so other callers wait for at most one O(capacity) scan.
///
/// # Errors
/// Returns `CacheError::InvalidConfig` for a zero interval, which would
/// retake the write lock back to back and starve every other caller.
///
/// # Example
/// ```ignore
/// let cache = SessionCache::new(10, 86_400)?;
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(300))?;
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweeper(cache: SessionCache, interval: Duration) -> Result<SweeperHandle> {
    if interval.is_zero() {
        return Err(CacheError::InvalidConfig(
            "sweep interval must be positive".to_string(),
        ));
    }

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting TTL sweeper with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown_rx.changed() => {
                    // Closed channel means the handle was dropped
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!("TTL sweeper received stop signal");
                        break;
                    }
                    continue;
                }
            }

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("TTL sweep: removed {} expired sessions", removed);
            } else {
                debug!("TTL sweep: no expired sessions found");
            }

            let stats = cache.stats().await;
            debug!(
                "Session cache: {} live, hit rate {:.2}, {} evicted, {} expired",
                stats.total_entries,
                stats.hit_rate(),
                stats.evictions,
                stats.expirations
            );
        }
    });

    Ok(SweeperHandle { shutdown_tx, task })
}
