//! Result poller
//!
//! Polls a job handle until the backend reports a terminal status or the
//! owning scope cancels. Each tick waits for the previous status request to
//! settle before the delay starts, so ticks never overlap and a slow backend
//! slows the cadence down instead of piling up requests.

use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use oncoclass_core::dto::job::{DataEnvelope, ErrorEnvelope};

use crate::cancel::CancellationToken;
use crate::config::PollConfig;
use crate::error::JobError;
use crate::submit::JobHandle;
use crate::transport::{JobTransport, TransportResponse};

/// Classification of one tick, or the terminal result of a polling cycle
#[derive(Debug)]
pub enum PollOutcome {
    /// The backend is still processing
    Pending,
    /// The job finished; holds the `data` field of the body
    Success(JsonValue),
    /// The job failed, or its status could not be read
    Failure(JobError),
    /// Cancellation was observed before the next status request
    Cancelled,
}

impl PollOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollOutcome::Pending)
    }
}

/// Repeatedly queries a job handle on a fixed (or backed-off) cadence
#[derive(Clone)]
pub struct ResultPoller {
    transport: Arc<dyn JobTransport>,
    config: PollConfig,
}

impl ResultPoller {
    /// Creates a poller
    ///
    /// A configuration that fails `PollConfig::validate` is replaced by the
    /// defaults, so a zero interval or a broken backoff never reaches the
    /// polling loop.
    pub fn new(transport: Arc<dyn JobTransport>, config: PollConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Invalid poll configuration ({}), using defaults", e);
                PollConfig::default()
            }
        };
        Self { transport, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls `handle` until a terminal outcome
    ///
    /// Every tick first waits the current interval, then checks `token`; a
    /// set token ends the cycle with `Cancelled` without issuing a request.
    /// The returned outcome is never `Pending`.
    pub async fn poll(&self, handle: JobHandle, token: &CancellationToken) -> PollOutcome {
        let started = Instant::now();
        let mut delay = self.config.interval;
        let mut tick: u32 = 0;

        loop {
            time::sleep(delay).await;
            tick += 1;

            if token.is_cancelled() {
                info!("Polling {} cancelled before tick {}", handle, tick);
                return PollOutcome::Cancelled;
            }

            if let Some(max_wait) = self.config.max_wait {
                if started.elapsed() >= max_wait {
                    warn!("Giving up on {} after {} tick(s)", handle, tick - 1);
                    return PollOutcome::Failure(JobError::TimedOut(max_wait));
                }
            }

            let outcome = match self.transport.fetch(handle.url()).await {
                Ok(response) => self.classify(&response),
                Err(e) => {
                    warn!("Status request to {} failed: {}", handle, e);
                    PollOutcome::Failure(JobError::Transport(e.to_string()))
                }
            };

            if outcome.is_terminal() {
                debug!("Polling {} finished after {} tick(s)", handle, tick);
                return outcome;
            }

            debug!("Job at {} still processing (tick {})", handle, tick);
            delay = self.next_delay(delay);
        }
    }

    /// Interprets one status response
    pub fn classify(&self, response: &TransportResponse) -> PollOutcome {
        if response.status == self.config.pending_status {
            return PollOutcome::Pending;
        }

        if response.is_success() {
            return match response.json::<DataEnvelope<JsonValue>>() {
                Ok(envelope) => PollOutcome::Success(envelope.data),
                Err(e) => PollOutcome::Failure(JobError::Transport(format!(
                    "unreadable result body: {}",
                    e
                ))),
            };
        }

        let description = response
            .json::<ErrorEnvelope>()
            .ok()
            .map(|envelope| envelope.error.description);
        let detail = description
            .clone()
            .unwrap_or_else(|| "no error description".to_string());

        PollOutcome::Failure(JobError::Backend {
            status: response.status,
            description,
            detail,
        })
    }

    fn next_delay(&self, current: Duration) -> Duration {
        self.config.next_interval(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::JobSubmitter;
    use crate::testing::{Reply, ScriptedTransport};
    use crate::transport::JobPayload;
    use reqwest::Url;
    use serde_json::json;

    const INTERVAL: Duration = Duration::from_millis(2000);

    async fn handle_for(transport: &Arc<ScriptedTransport>) -> JobHandle {
        let endpoint = Url::parse("http://localhost:5000/confidence").unwrap();
        JobSubmitter::new(transport.clone())
            .submit(&endpoint, &JobPayload::Json(json!({})))
            .await
            .unwrap()
    }

    fn poller(transport: &Arc<ScriptedTransport>, config: PollConfig) -> ResultPoller {
        ResultPoller::new(transport.clone(), config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_pending_ticks() {
        let transport = Arc::new(ScriptedTransport::accepting(
            "/r/123",
            vec![
                Reply::pending(),
                Reply::pending(),
                Reply::json(200, json!({"data": {"value": 42}})),
            ],
        ));
        let handle = handle_for(&transport).await;
        let token = CancellationToken::new();

        let started = Instant::now();
        let outcome = poller(&transport, PollConfig::with_interval(INTERVAL))
            .poll(handle, &token)
            .await;

        assert!(matches!(outcome, PollOutcome::Success(ref data) if *data == json!({"value": 42})));
        assert_eq!(transport.fetch_count(), 3);
        assert_eq!(started.elapsed(), INTERVAL * 3);
        assert!(
            transport
                .fetched()
                .iter()
                .all(|url| url.as_str() == "http://localhost:5000/r/123")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_further_requests() {
        let token = CancellationToken::new();
        let transport = Arc::new(
            ScriptedTransport::accepting("/r/123", Vec::new()).cancelling_after(1, &token),
        );
        let handle = handle_for(&transport).await;

        let outcome = poller(&transport, PollConfig::with_interval(INTERVAL))
            .poll(handle, &token)
            .await;

        assert!(matches!(outcome, PollOutcome::Cancelled));
        assert_eq!(transport.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_token_issues_no_request() {
        let transport = Arc::new(ScriptedTransport::accepting("/r/1", Vec::new()));
        let handle = handle_for(&transport).await;
        let token = CancellationToken::new();
        token.cancel();

        let outcome = poller(&transport, PollConfig::default())
            .poll(handle, &token)
            .await;

        assert!(matches!(outcome, PollOutcome::Cancelled));
        assert_eq!(transport.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_failure_carries_description() {
        let transport = Arc::new(ScriptedTransport::accepting(
            "/r/9",
            vec![
                Reply::pending(),
                Reply::json(
                    400,
                    json!({"error": {"code": 400, "name": "Bad Request", "description": "invalid interval"}}),
                ),
            ],
        ));
        let handle = handle_for(&transport).await;

        let outcome = poller(&transport, PollConfig::default())
            .poll(handle, &CancellationToken::new())
            .await;

        match outcome {
            PollOutcome::Failure(err @ JobError::Backend { status: 400, .. }) => {
                assert_eq!(err.user_message(), "invalid interval");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(transport.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_is_terminal() {
        let transport = Arc::new(ScriptedTransport::accepting(
            "/r/7",
            vec![Reply::Unreachable, Reply::json(200, json!({"data": 1}))],
        ));
        let handle = handle_for(&transport).await;

        let outcome = poller(&transport, PollConfig::default())
            .poll(handle, &CancellationToken::new())
            .await;

        assert!(matches!(outcome, PollOutcome::Failure(JobError::Transport(_))));
        assert_eq!(transport.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_wait_times_out() {
        let transport = Arc::new(ScriptedTransport::accepting("/r/slow", Vec::new()));
        let handle = handle_for(&transport).await;
        let config = PollConfig::with_interval(Duration::from_secs(1))
            .with_max_wait(Duration::from_secs(5));

        let outcome = poller(&transport, config)
            .poll(handle, &CancellationToken::new())
            .await;

        assert!(matches!(outcome, PollOutcome::Failure(JobError::TimedOut(_))));
        assert_eq!(transport.fetch_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_spaces_out_ticks() {
        let transport = Arc::new(ScriptedTransport::accepting(
            "/r/5",
            vec![
                Reply::pending(),
                Reply::pending(),
                Reply::pending(),
                Reply::json(200, json!({"data": []})),
            ],
        ));
        let handle = handle_for(&transport).await;
        let config = PollConfig::with_interval(Duration::from_secs(1))
            .with_backoff(2.0, Duration::from_secs(3));

        let started = Instant::now();
        let outcome = poller(&transport, config)
            .poll(handle, &CancellationToken::new())
            .await;

        assert!(matches!(outcome, PollOutcome::Success(_)));
        // 1s + 2s + 3s (capped) + 3s
        assert_eq!(started.elapsed(), Duration::from_secs(9));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let transport = Arc::new(ScriptedTransport::accepting("/r/1", Vec::new()));

        let zero_interval = PollConfig::with_interval(Duration::ZERO);
        assert_eq!(poller(&transport, zero_interval).config(), &PollConfig::default());

        let mut nan_backoff = PollConfig::with_interval(Duration::from_secs(1));
        nan_backoff.backoff_factor = f64::NAN;
        assert_eq!(poller(&transport, nan_backoff).config(), &PollConfig::default());

        let valid = PollConfig::with_interval(Duration::from_millis(500));
        assert_eq!(poller(&transport, valid.clone()).config(), &valid);
    }

    #[test]
    fn test_classify_unreadable_success_body() {
        let transport = Arc::new(ScriptedTransport::accepting("/r/1", Vec::new()));
        let poller = poller(&transport, PollConfig::default());

        let outcome = poller.classify(&TransportResponse::new(200, "not json"));
        assert!(matches!(outcome, PollOutcome::Failure(JobError::Transport(_))));

        let outcome = poller.classify(&TransportResponse::new(201, ""));
        assert!(matches!(outcome, PollOutcome::Pending));

        let outcome = poller.classify(&TransportResponse::new(500, ""));
        assert!(matches!(
            outcome,
            PollOutcome::Failure(JobError::Backend { description: None, .. })
        ));
    }
}
