//! Asynchronous job runner
//!
//! Composes submission, polling and error normalization into the single
//! operation every analysis feature uses. A run always resolves: results on
//! success, an empty failed outcome otherwise. Failures are reported through
//! the runner's `Notifier` exactly once; successes and cancellations are not.

use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

use oncoclass_core::domain::job::JobOutcome;

use crate::cancel::CancellationToken;
use crate::config::PollConfig;
use crate::error::JobError;
use crate::notify::Notifier;
use crate::poller::{PollOutcome, ResultPoller};
use crate::submit::JobSubmitter;
use crate::transport::{HttpTransport, JobPayload, JobTransport};

/// Runs backend jobs from submission to a normalized outcome
///
/// The runner holds no per-job state: every `run` owns its own polling loop,
/// so one runner can serve several concurrent jobs, each guarded by its
/// own token.
#[derive(Clone)]
pub struct AsyncJobRunner {
    submitter: JobSubmitter,
    poller: ResultPoller,
    notifier: Arc<dyn Notifier>,
}

impl AsyncJobRunner {
    pub fn new(
        transport: Arc<dyn JobTransport>,
        config: PollConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            submitter: JobSubmitter::new(Arc::clone(&transport)),
            poller: ResultPoller::new(transport, config),
            notifier,
        }
    }

    /// Creates a runner that talks HTTP through a default reqwest client
    pub fn http(config: PollConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Arc::new(HttpTransport::new()), config, notifier)
    }

    pub fn config(&self) -> &PollConfig {
        self.poller.config()
    }

    /// Submits a job to `endpoint` and waits for its result
    ///
    /// The caller owns `token` and must reset it before calling; setting it
    /// while the job runs stops polling within one interval and yields a
    /// cancelled outcome. A token that is already set yields a cancelled
    /// outcome without submitting anything.
    pub async fn run(
        &self,
        endpoint: &str,
        payload: JobPayload,
        token: &CancellationToken,
    ) -> JobOutcome {
        if token.is_cancelled() {
            info!(
                "Not submitting job to {}: token is already cancelled",
                endpoint
            );
            return JobOutcome::cancelled();
        }

        let endpoint = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                return self.fail(JobError::malformed_submission(format!(
                    "invalid endpoint {:?}: {}",
                    endpoint, e
                )));
            }
        };

        let handle = match self.submitter.submit(&endpoint, &payload).await {
            Ok(handle) => handle,
            Err(e) => return self.fail(e),
        };

        info!("Job submitted to {}, polling {}", endpoint, handle);

        match self.poller.poll(handle, token).await {
            PollOutcome::Success(results) => {
                info!("Job submitted to {} succeeded", endpoint);
                JobOutcome::succeeded(results)
            }
            PollOutcome::Cancelled => {
                info!("Job submitted to {} was cancelled", endpoint);
                JobOutcome::cancelled()
            }
            PollOutcome::Failure(e) => self.fail(e),
            PollOutcome::Pending => {
                // poll() only returns terminal outcomes
                self.fail(JobError::Transport(
                    "polling ended without a terminal status".to_string(),
                ))
            }
        }
    }

    /// Reports `error` once and returns the matching failed outcome
    pub(crate) fn fail(&self, error: JobError) -> JobOutcome {
        warn!("Job failed: {}", error);
        debug!("Notifying user: {}", error.user_message());
        self.notifier.notify(error.user_message());
        JobOutcome::failed(error.reason())
    }
}
