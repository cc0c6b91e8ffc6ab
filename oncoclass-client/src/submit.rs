//! Job submission
//!
//! Starts a job on the backend and extracts the handle its result will be
//! polled from.

use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use oncoclass_core::dto::job::{ErrorEnvelope, JobAccepted};

use crate::error::JobError;
use crate::transport::{JobPayload, JobTransport};

/// Location of a pending job's status endpoint
///
/// A handle is valid for the one polling cycle that follows the submission
/// which produced it; polling consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct JobHandle {
    url: Url,
}

impl JobHandle {
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

/// Performs the request that starts backend work
#[derive(Clone)]
pub struct JobSubmitter {
    transport: Arc<dyn JobTransport>,
}

impl JobSubmitter {
    pub fn new(transport: Arc<dyn JobTransport>) -> Self {
        Self { transport }
    }

    /// Submits a job and returns the handle to poll
    ///
    /// # Errors
    /// `JobError::Submission` when the request cannot be sent, the backend
    /// answers with a non-success status (carrying its description when the
    /// body has one), or a success body lacks a usable `resultURL`.
    pub async fn submit(&self, endpoint: &Url, payload: &JobPayload) -> Result<JobHandle, JobError> {
        let response = self
            .transport
            .submit(endpoint, payload)
            .await
            .map_err(|e| JobError::malformed_submission(e.to_string()))?;

        if !response.is_success() {
            let description = response
                .json::<ErrorEnvelope>()
                .ok()
                .map(|envelope| envelope.error.description);
            warn!(
                "Submission to {} rejected with status {}: {:?}",
                endpoint, response.status, description
            );
            return Err(match description {
                Some(description) => JobError::rejected(description),
                None => JobError::malformed_submission(format!(
                    "status {} without error description",
                    response.status
                )),
            });
        }

        let accepted: JobAccepted = response.json().map_err(|e| {
            JobError::malformed_submission(format!("response has no resultURL: {}", e))
        })?;

        let url = resolve_handle(endpoint, accepted.result_url())?;
        debug!("Job accepted by {}, polling {}", endpoint, url);

        Ok(JobHandle { url })
    }
}

/// Resolves a possibly relative `resultURL` against the submission endpoint
fn resolve_handle(endpoint: &Url, result_url: &str) -> Result<Url, JobError> {
    let url = endpoint.join(result_url).map_err(|e| {
        JobError::malformed_submission(format!("invalid resultURL {:?}: {}", result_url, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(JobError::malformed_submission(format!(
            "resultURL {:?} is not an http(s) address",
            result_url
        )));
    }

    Ok(url)
}
