//! Polling synchronizer.
//!
//! There is no push channel anywhere in the system. Every read-only surface
//! (display board, recency ticker, advisory line) re-polls the store on its
//! own repeating task and owns its snapshot, so each view can be stale by at
//! most one polling interval. Only the staff console path calls the board's
//! mutating operations; polling consumers stick to `list` and
//! `recent_updates`.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Refresh cadence for the recency ticker.
pub const FEED_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Refresh cadence for the advisory text.
pub const ADVISORY_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to a repeating poll task.
///
/// Cancelling, or simply dropping, the handle stops the task, so a torn-down
/// view never leaks periodic work.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the repeating task.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `tick` immediately and then once per `interval` until cancelled.
pub fn repeat<F>(interval: Duration, mut tick: F) -> PollHandle
where
    F: FnMut() + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            tick();
        }
    });
    PollHandle { task }
}

/// A consumer-owned snapshot of a query result, refreshed by its poll task.
///
/// Each consumer builds its own `Snapshot`; none of them share state beyond
/// the store they poll.
pub struct Snapshot<T> {
    rx: watch::Receiver<T>,
    handle: PollHandle,
}

impl<T: Clone> Snapshot<T> {
    /// The latest polled value, stale by at most one interval.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Stop refreshing; `get` keeps returning the last value.
    pub fn cancel(&self) {
        self.handle.cancel();
    }
}

/// Spawn a poll task that refreshes a snapshot every `interval`.
///
/// `refresh` runs once up front so the snapshot never starts empty.
pub fn poll_snapshot<T, F>(interval: Duration, mut refresh: F) -> Snapshot<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnMut() -> T + Send + 'static,
{
    let (tx, rx) = watch::channel(refresh());
    let handle = repeat(interval, move || {
        tx.send(refresh()).ok();
    });
    Snapshot { rx, handle }
}
