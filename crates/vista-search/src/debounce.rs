//! Trailing-edge debounce timer
//!
//! Each `schedule` call replaces the pending trigger, so a burst of calls
//! fires once, `quiet` after the last of them.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Quiet interval between the last keystroke and the suggestion fetch
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(120);

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Run `fire` once the quiet period passes without another call.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            fire();
        }));
    }

    /// Drop the pending trigger, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
