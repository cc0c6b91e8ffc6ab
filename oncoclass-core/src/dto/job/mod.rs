//! Job DTOs for backend communication
//!
//! Envelopes used by the asynchronous job protocol:
//! - `POST <endpoint>` answers with `{ "data": { "resultURL": ... } }`
//! - `GET <resultURL>` answers with `{ "data": ... }` once finished
//! - any failure answers with `{ "error": { "code", "name", "description" } }`

use serde::{Deserialize, Serialize};

/// Successful response body wrapping a payload in `data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Handle location returned when a job is accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultLocation {
    #[serde(rename = "resultURL")]
    pub result_url: String,
}

/// Body of a job acceptance response
///
/// The handle is normally nested under `data`; some backend builds place
/// `resultURL` at the top level instead, so both shapes are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobAccepted {
    Nested(DataEnvelope<ResultLocation>),
    Flat(ResultLocation),
}

impl JobAccepted {
    pub fn result_url(&self) -> &str {
        match self {
            JobAccepted::Nested(envelope) => &envelope.data.result_url,
            JobAccepted::Flat(location) => &location.result_url,
        }
    }
}

/// Structured error description sent by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
    pub description: String,
}

/// Failure response body wrapping an `ErrorDetail` in `error`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}
