//! Cancellation scope for one CLI invocation
//!
//! Each analysis gets its own token. Ctrl-C cancels every token in the
//! scope; dropping the scope does too, so no poll outlives the command.

use oncoclass_client::{CancelOnDrop, CancellationToken};
use tokio::task::JoinHandle;
use tracing::warn;

/// Owns the cancellation tokens of the analyses started by a command
pub struct Scope {
    tokens: Vec<CancellationToken>,
    guards: Vec<CancelOnDrop>,
    interrupt: Option<JoinHandle<()>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            guards: Vec::new(),
            interrupt: None,
        }
    }

    /// Creates a fresh token for one analysis
    ///
    /// The token starts clear, so callers do not need to reset it.
    pub fn token(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.guards.push(token.cancel_on_drop());
        self.tokens.push(token.clone());
        token
    }

    /// Cancels every token in the scope when Ctrl-C is pressed
    ///
    /// Only tokens created before this call are covered.
    pub fn cancel_on_interrupt(&mut self) {
        let tokens = self.tokens.clone();
        self.interrupt = Some(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling {} analysis job(s)", tokens.len());
                for token in &tokens {
                    token.cancel();
                }
            }
        }));
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if let Some(interrupt) = self.interrupt.take() {
            interrupt.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_independent() {
        let mut scope = Scope::new();
        let first = scope.token();
        let second = scope.token();

        first.cancel();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_dropping_scope_cancels_tokens() {
        let token = {
            let mut scope = Scope::new();
            scope.token()
        };
        assert!(token.is_cancelled());
    }
}
