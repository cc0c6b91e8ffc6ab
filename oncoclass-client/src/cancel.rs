//! Cooperative cancellation
//!
//! A token is owned by the scope that starts jobs (a page, a command, a
//! session) and shared with every poll it starts. The poller only reads it,
//! at the start of each tick, so a request made mid-tick takes effect one
//! interval later and never aborts an in-flight status request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
///
/// Unlike a one-shot token, this flag outlives a single job: the owner calls
/// `reset` before starting the next job.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    requested: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of any poll observing this token
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns true when cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Clears a previous request so the token can guard a new job
    pub fn reset(&self) {
        self.requested.store(false, Ordering::Release);
    }

    /// Returns a guard that requests cancellation when dropped
    ///
    /// Tie the guard to the lifetime of the owning scope so that tearing
    /// the scope down stops its in-flight polls.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop {
            token: Some(self.clone()),
        }
    }
}

/// Cancels its token when dropped, unless disarmed
#[derive(Debug)]
pub struct CancelOnDrop {
    token: Option<CancellationToken>,
}

impl CancelOnDrop {
    /// Drops the guard without cancelling
    pub fn disarm(mut self) {
        self.token = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
