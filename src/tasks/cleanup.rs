//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired API cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

/// Shortest sweep period; a zero interval is raised to this.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running cleanup task.
///
/// The sweep keeps running until [`CleanupTask::stop`] is called or the
/// runtime shuts down.
#[derive(Debug)]
pub struct CleanupTask {
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Spawns a task that calls `cleanup()` on `cache` every `interval`.
    ///
    /// The first sweep runs one full interval after start. A zero
    /// `interval` is raised to one second.
    ///
    /// # Example
    /// ```ignore
    /// let cache = shared(ApiCache::<Value>::new(DEFAULT_TTL_MS));
    /// let task = CleanupTask::start(cache.clone(), Duration::from_secs(300));
    /// // Later, during shutdown:
    /// task.stop();
    /// ```
    pub fn start<T>(cache: SharedCache<T>, interval: Duration) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let interval = if interval.is_zero() {
            warn!("Cleanup interval of zero requested, using {:?}", MIN_INTERVAL);
            MIN_INTERVAL
        } else {
            interval
        };

        let handle = tokio::spawn(async move {
            info!(
                "Starting API cache cleanup task with interval of {:?}",
                interval
            );

            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

            loop {
                ticker.tick().await;

                let removed = {
                    let mut cache_guard = cache.write().await;
                    cache_guard.cleanup()
                };

                if removed > 0 {
                    info!("API cache cleanup: removed {} expired entries", removed);
                } else {
                    debug!("API cache cleanup: no expired entries found");
                }
            }
        });

        Self { handle }
    }

    /// Stops the sweep. Entries already in the cache are left as they are.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
