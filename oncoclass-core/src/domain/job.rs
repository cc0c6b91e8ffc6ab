//! Job domain types

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Why an asynchronous job did not produce results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The backend rejected the job, or its acceptance response was malformed
    Submission,
    /// A status request failed before the backend answered
    Transport,
    /// The backend reported a terminal failure for the job
    Backend,
    /// The owning scope requested cancellation
    Cancelled,
    /// Polling exceeded the configured maximum wait
    TimedOut,
}

/// Normalized result of one asynchronous job
///
/// Callers branch on `success`. `results` carries the backend's `data` field
/// verbatim when the job succeeded and is `None` otherwise. `reason` keeps the
/// failure kind so cancellation can be told apart from a genuine failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub success: bool,
    pub results: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl JobOutcome {
    /// A successful outcome carrying the backend payload
    pub fn succeeded(results: serde_json::Value) -> Self {
        Self {
            success: true,
            results: Some(results),
            cancelled: false,
            reason: None,
        }
    }

    /// A failed outcome with no results
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            success: false,
            results: None,
            cancelled: reason == FailureReason::Cancelled,
            reason: Some(reason),
        }
    }

    /// The outcome of a run whose cancellation token was set mid-poll
    pub fn cancelled() -> Self {
        Self::failed(FailureReason::Cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Deserializes the results into a feature-specific type
    ///
    /// Returns `None` when the job did not succeed.
    pub fn into_results<T: DeserializeOwned>(self) -> Option<serde_json::Result<T>> {
        self.results.map(serde_json::from_value)
    }
}
