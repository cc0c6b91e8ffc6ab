//! Analysis request DTOs
//!
//! JSON bodies submitted to the `/tsne` and `/confidence` endpoints. Bulk
//! classification uploads a CSV file instead and has no JSON body.

use serde::{Deserialize, Serialize};

/// A sample sent back to the backend for a follow-up analysis
///
/// Gene order is significant: the backend feeds the values to its model in
/// the order they appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "sampleID")]
    pub sample_id: String,
    pub genes: serde_json::Map<String, serde_json::Value>,
}

/// Request body for a t-SNE embedding job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsneRequest {
    pub samples: Vec<Sample>,
    pub perplexity: u32,
    pub num_dimensions: u32,
}

/// Request body for a confidence interval job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceRequest {
    pub samples: Vec<Sample>,
    /// Interval width in percent
    pub interval: u32,
}
