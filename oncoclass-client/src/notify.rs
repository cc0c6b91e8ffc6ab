//! Failure notification sinks
//!
//! A failed job surfaces its message through exactly one call to a
//! `Notifier`. What that means is up to the caller: a modal, a log line,
//! a channel.

use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Receives the user-facing message of a failed job
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Reports failures through the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

#[derive(Debug, Default)]
struct ModalState {
    message: Option<String>,
    open: bool,
}

/// A warning dialog: the last failure message plus whether it is showing
#[derive(Debug, Default)]
pub struct WarningModal {
    state: Mutex<ModalState>,
}

impl WarningModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message most recently shown, if any
    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Closes the dialog; the message is kept for later inspection
    pub fn dismiss(&self) {
        self.lock().open = false;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ModalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for WarningModal {
    fn notify(&self, message: &str) {
        let mut state = self.lock();
        state.message = Some(message.to_string());
        state.open = true;
    }
}
