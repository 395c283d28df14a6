//! Periodic expiry sweep for the response cache.

use super::ResponseCache;
use crate::{Result, RoutingError};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Owns a running sweep. Dropping the handle stops it.
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl CleanupHandle {
    /// Signals the sweep to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.send_replace(true);
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(error) = task.await {
            tracing::warn!("cache sweep task ended abnormally: {error}");
        }
    }

    /// Whether the sweep task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

impl ResponseCache {
    /// Starts a background task that calls [`Self::remove_expired`] every `period`.
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped, or when the returned handle is shut down or dropped.
    ///
    /// # Errors
    /// Returns an error when called outside a tokio runtime.
    pub fn spawn_cleanup(self: &Arc<Self>, period: Duration) -> Result<CleanupHandle> {
        let runtime = Handle::try_current()
            .map_err(|error| RoutingError::Other(format!("cache sweep needs a runtime: {error}")))?;
        let period = period.max(Duration::from_millis(1));
        let (shutdown, mut signal) = watch::channel(false);
        let cache: Weak<Self> = Arc::downgrade(self);

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(cache) = cache.upgrade() else {
                            tracing::debug!("cache dropped, sweep exiting");
                            break;
                        };
                        cache.remove_expired();
                    }
                    _ = signal.changed() => {
                        tracing::debug!("cache sweep shutdown signal received");
                        break;
                    }
                }
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "cache sweep started");
        Ok(CleanupHandle {
            shutdown,
            task: Some(task),
        })
    }
}
