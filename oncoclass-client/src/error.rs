//! Error types for the Oncoclass client

use std::time::Duration;
use thiserror::Error;

use oncoclass_core::domain::job::FailureReason;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Message shown to the user when the backend gave no description
pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry something went wrong! Please try again later.";

/// Errors raised by the transport and request-building layer
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Why an asynchronous job failed
///
/// Every variant is caught by the job runner and turned into a failed
/// `JobOutcome` plus a single notification. `description` holds the
/// backend's human-readable message when it sent one.
#[derive(Debug, Error)]
pub enum JobError {
    /// The job could not be created
    #[error("Job submission failed: {detail}")]
    Submission {
        description: Option<String>,
        detail: String,
    },

    /// A status request failed or returned an unreadable body
    #[error("Transport error while polling: {0}")]
    Transport(String),

    /// The backend reported a terminal failure
    #[error("Backend reported failure (status {status}): {detail}")]
    Backend {
        status: u16,
        description: Option<String>,
        detail: String,
    },

    /// No terminal status arrived within the configured maximum wait
    #[error("No result after waiting {0:?}")]
    TimedOut(Duration),
}

impl JobError {
    /// Submission rejected with a message meant for the user
    pub fn rejected(description: impl Into<String>) -> Self {
        let description = description.into();
        Self::Submission {
            detail: description.clone(),
            description: Some(description),
        }
    }

    /// Submission failed for a reason the user cannot act on
    pub fn malformed_submission(detail: impl Into<String>) -> Self {
        Self::Submission {
            description: None,
            detail: detail.into(),
        }
    }

    /// The failure kind exposed on `JobOutcome`
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Submission { .. } => FailureReason::Submission,
            Self::Transport(_) => FailureReason::Transport,
            Self::Backend { .. } => FailureReason::Backend,
            Self::TimedOut(_) => FailureReason::TimedOut,
        }
    }

    /// The message surfaced to the user: the backend description, or a generic fallback
    pub fn user_message(&self) -> &str {
        match self {
            Self::Submission {
                description: Some(description),
                ..
            }
            | Self::Backend {
                description: Some(description),
                ..
            } => description,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
