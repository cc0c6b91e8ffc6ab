//! Transport layer
//!
//! The job protocol needs two kinds of request: a submission (`POST`, JSON or
//! multipart) and a status fetch (`GET`). `JobTransport` abstracts both so the
//! submitter and poller can be driven by a scripted transport in tests.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};

/// Body of a job submission
#[derive(Debug, Clone)]
pub enum JobPayload {
    /// Arbitrary JSON body
    Json(serde_json::Value),

    /// Sample file upload, sent as multipart form data
    ///
    /// The file goes in the `samples` part and the delimiter in `delimiter`.
    CsvUpload {
        file_name: String,
        contents: Vec<u8>,
        delimiter: String,
    },
}

impl JobPayload {
    /// Serializes a request struct into a JSON payload
    pub fn json<T: Serialize>(body: &T) -> Result<Self> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to serialize body: {}", e)))
    }
}

/// Status and raw body of a backend response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends job requests to the backend
#[async_trait]
pub trait JobTransport: Send + Sync {
    /// Starts a job by posting its payload to `url`
    async fn submit(&self, url: &Url, payload: &JobPayload) -> Result<TransportResponse>;

    /// Fetches the current status of a job
    async fn fetch(&self, url: &Url) -> Result<TransportResponse>;
}

/// HTTP implementation of JobTransport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl JobTransport for HttpTransport {
    async fn submit(&self, url: &Url, payload: &JobPayload) -> Result<TransportResponse> {
        let request = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        let request = match payload {
            JobPayload::Json(body) => request.json(body),
            JobPayload::CsvUpload {
                file_name,
                contents,
                delimiter,
            } => {
                let file = Part::bytes(contents.clone())
                    .file_name(file_name.clone())
                    .mime_str("text/csv")?;
                let form = Form::new()
                    .part("samples", file)
                    .text("delimiter", delimiter.clone());
                request.multipart(form)
            }
        };

        let response = request.send().await?;
        debug!("Submission to {} answered {}", url, response.status());
        Self::read(response).await
    }

    async fn fetch(&self, url: &Url) -> Result<TransportResponse> {
        let response = self.client.get(url.clone()).send().await?;
        Self::read(response).await
    }
}
