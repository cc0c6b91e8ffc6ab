//! Analysis endpoints
//!
//! Typed entry points for the three long-running analyses. Each one checks
//! the request the same way the backend would, then hands it to the job
//! runner, so a request that can only be rejected never leaves the client.

use oncoclass_core::domain::job::JobOutcome;
use oncoclass_core::dto::analysis::{ConfidenceRequest, TsneRequest};

use crate::cancel::CancellationToken;
use crate::error::{ClientError, JobError, Result};
use crate::runner::AsyncJobRunner;
use crate::transport::JobPayload;

/// Largest perplexity the backend accepts
pub const MAX_PERPLEXITY: u32 = 500;

/// Smallest sample count a t-SNE embedding needs
pub const MIN_TSNE_SAMPLES: usize = 3;

/// Client for the analysis API
#[derive(Clone)]
pub struct AnalysisClient {
    /// Base URL of the API (e.g., "http://localhost:5000")
    base_url: String,
    runner: AsyncJobRunner,
}

impl AnalysisClient {
    /// Create a new analysis client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the analysis API
    /// * `runner` - The job runner used for every analysis
    pub fn new(base_url: impl Into<String>, runner: AsyncJobRunner) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            runner,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Bulk classification
    // =============================================================================

    /// Uploads a sample file for full classification
    ///
    /// # Arguments
    /// * `file_name` - Name reported for the uploaded file
    /// * `contents` - Raw CSV/TXT bytes
    /// * `delimiter` - Column delimiter used in the file
    /// * `token` - Cancellation token owned by the caller
    pub async fn analyse(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        delimiter: &str,
        token: &CancellationToken,
    ) -> JobOutcome {
        if contents.is_empty() {
            return self
                .runner
                .fail(JobError::rejected("The sample file is empty"));
        }

        let url = format!("{}/analyse", self.base_url);
        let payload = JobPayload::CsvUpload {
            file_name: file_name.to_string(),
            contents,
            delimiter: delimiter.to_string(),
        };

        self.runner.run(&url, payload, token).await
    }

    // =============================================================================
    // Follow-up analyses
    // =============================================================================

    /// Embeds samples with t-SNE
    pub async fn tsne(&self, request: &TsneRequest, token: &CancellationToken) -> JobOutcome {
        let url = format!("{}/tsne", self.base_url);
        self.submit_json(&url, validate_tsne(request).map(|_| request), token)
            .await
    }

    /// Computes bootstrap confidence intervals for each sample's prediction
    pub async fn confidence(
        &self,
        request: &ConfidenceRequest,
        token: &CancellationToken,
    ) -> JobOutcome {
        let url = format!("{}/confidence", self.base_url);
        self.submit_json(&url, validate_confidence(request).map(|_| request), token)
            .await
    }

    async fn submit_json<T: serde::Serialize>(
        &self,
        url: &str,
        request: Result<&T>,
        token: &CancellationToken,
    ) -> JobOutcome {
        match request.and_then(JobPayload::json) {
            Ok(payload) => self.runner.run(url, payload, token).await,
            Err(ClientError::InvalidRequest(message)) => {
                self.runner.fail(JobError::rejected(message))
            }
            Err(e) => self.runner.fail(JobError::malformed_submission(e.to_string())),
        }
    }
}

/// Checks a t-SNE request against the backend's limits
pub fn validate_tsne(request: &TsneRequest) -> Result<()> {
    let samples = request.samples.len();

    if samples < MIN_TSNE_SAMPLES {
        return Err(ClientError::InvalidRequest(format!(
            "At least {} samples is required for t-SNE analysis",
            MIN_TSNE_SAMPLES
        )));
    }

    if request.perplexity == 0
        || request.perplexity > MAX_PERPLEXITY
        || request.perplexity as usize >= samples
        || !(2..=100).contains(&request.num_dimensions)
    {
        return Err(ClientError::InvalidRequest(
            "Bad perplexity or number of dimensions.".to_string(),
        ));
    }

    Ok(())
}

/// Checks a confidence request against the backend's limits
pub fn validate_confidence(request: &ConfidenceRequest) -> Result<()> {
    if request.interval == 0 {
        return Err(ClientError::InvalidRequest("missing interval".to_string()));
    }

    if request.interval > 100 {
        return Err(ClientError::InvalidRequest("invalid interval".to_string()));
    }

    Ok(())
}

/// Largest perplexity usable for `samples` samples, if any
pub fn max_perplexity(samples: usize) -> Option<u32> {
    let limit = samples.saturating_sub(1).min(MAX_PERPLEXITY as usize) as u32;
    (samples >= MIN_TSNE_SAMPLES && limit >= 1).then_some(limit)
}
