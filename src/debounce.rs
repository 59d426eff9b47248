//! Debounced scheduling for search-driven reloads.
//!
//! Rapid successive query changes must coalesce so that only the reload for
//! the last change within the quiet window actually executes.

use std::future::Future;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use log::trace;
use tokio::time;

/// Coalesces rapid repeated triggers into a single delayed action.
///
/// Each `schedule` call supersedes any pending action: the superseded task
/// wakes after the quiet window, sees that its generation is stale, and
/// returns without running. Superseded actions are therefore cancelled
/// before they start and never race a newer one. Dropping the debouncer
/// invalidates whatever is still pending.
pub struct Debouncer {
    /// Quiet window between the last trigger and the action running
    delay: Duration,

    /// Generation of the most recent schedule; stale tasks no-op
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedules `action` to run after the quiet window, replacing any
    /// previously scheduled action that has not started yet.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let current = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == current {
                trace!("Debounced action firing (generation {})", current);
                action.await;
            } else {
                trace!("Debounced action superseded (generation {})", current);
            }
        });
    }

    /// Cancels any pending action without scheduling a new one.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
