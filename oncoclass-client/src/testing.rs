//! Scripted transport for unit tests

use async_trait::async_trait;
use reqwest::Url;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::cancel::CancellationToken;
use crate::error::{ClientError, Result};
use crate::transport::{JobPayload, JobTransport, TransportResponse};

/// One scripted answer
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Respond(u16, String),
    Unreachable,
}

impl Reply {
    pub(crate) fn pending() -> Self {
        Reply::Respond(201, r#"{"status": "PENDING"}"#.to_string())
    }

    pub(crate) fn json(status: u16, body: serde_json::Value) -> Self {
        Reply::Respond(status, body.to_string())
    }

    fn into_result(self) -> Result<TransportResponse> {
        match self {
            Reply::Respond(status, body) => Ok(TransportResponse::new(status, body)),
            Reply::Unreachable => Err(ClientError::InvalidRequest(
                "connection refused".to_string(),
            )),
        }
    }
}

/// Replays canned responses and records what was requested
///
/// Once the fetch script runs out, every further fetch reports "pending".
pub(crate) struct ScriptedTransport {
    submit_reply: Reply,
    fetch_replies: Mutex<VecDeque<Reply>>,
    fetched: Mutex<Vec<Url>>,
    submitted: Mutex<Vec<Url>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedTransport {
    pub(crate) fn new(submit_reply: Reply, fetch_replies: Vec<Reply>) -> Self {
        Self {
            submit_reply,
            fetch_replies: Mutex::new(fetch_replies.into()),
            fetched: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    /// Accepts the job with the given handle, then replays `fetch_replies`
    pub(crate) fn accepting(result_url: &str, fetch_replies: Vec<Reply>) -> Self {
        Self::new(
            Reply::json(202, serde_json::json!({"data": {"resultURL": result_url}})),
            fetch_replies,
        )
    }

    /// Cancels `token` while the `fetches`-th status request is in flight
    pub(crate) fn cancelling_after(mut self, fetches: usize, token: &CancellationToken) -> Self {
        self.cancel_after = Some((fetches, token.clone()));
        self
    }

    pub(crate) fn fetched(&self) -> Vec<Url> {
        self.fetched.lock().unwrap().clone()
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    pub(crate) fn submitted(&self) -> Vec<Url> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobTransport for ScriptedTransport {
    async fn submit(&self, url: &Url, _payload: &JobPayload) -> Result<TransportResponse> {
        self.submitted.lock().unwrap().push(url.clone());
        self.submit_reply.clone().into_result()
    }

    async fn fetch(&self, url: &Url) -> Result<TransportResponse> {
        let count = {
            let mut fetched = self.fetched.lock().unwrap();
            fetched.push(url.clone());
            fetched.len()
        };

        if let Some((after, token)) = &self.cancel_after {
            if count == *after {
                token.cancel();
            }
        }

        let reply = self
            .fetch_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Reply::pending);
        reply.into_result()
    }
}
