pub mod session_loader;

use crate::events::TaskSlot;
use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Runs background jobs, at most one per [`TaskSlot`].
///
/// Spawning into an occupied slot aborts whatever still runs there. Its
/// outcome would carry an old ticket, so nothing is lost by not waiting.
#[derive(Default)]
pub struct BackgroundTaskManager {
    tasks: HashMap<TaskSlot, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, slot: TaskSlot, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.tasks.remove(&slot) {
            if !previous.is_finished() {
                tracing::debug!(?slot, "Superseding running job");
            }
            previous.abort();
        }

        self.tasks.insert(slot, tokio::spawn(future));
    }

    /// Abort every job. Returns how many were still running.
    pub fn cancel_all(&mut self) -> usize {
        let mut aborted = 0;
        for (slot, handle) in self.tasks.drain() {
            if !handle.is_finished() {
                tracing::debug!(?slot, "Cancelling job");
                aborted += 1;
            }
            handle.abort();
        }
        aborted
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
