//! Periodic foreground refresh.
//!
//! Runs a callback right away and then on a fixed interval until the returned
//! handle is stopped or dropped.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Owns the refresh loop. Dropping the handle stops it.
#[derive(Debug)]
pub struct RefresherHandle {
    task: JoinHandle<()>,
}

impl RefresherHandle {
    /// Stop the loop. An invocation already in flight is not interrupted.
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefresherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start invoking `callback` now and then every `period`.
///
/// Each invocation runs as its own task, so a panic in one run is logged and
/// the next tick still fires. Must be called from within a tokio runtime.
pub fn start_refresher<F, Fut>(callback: F, period: Duration) -> RefresherHandle
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        debug!("Refresher started ({} ms interval)", period.as_millis());

        // First tick completes immediately.
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = tokio::spawn(callback()).await {
                if e.is_panic() {
                    warn!("Refresh callback panicked; continuing");
                }
            }
        }
    });

    RefresherHandle { task }
}
