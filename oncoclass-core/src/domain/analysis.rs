//! Analysis result types
//!
//! Payloads found in the `data` field of a finished job, one per analysis
//! feature: bulk classification, t-SNE embedding and confidence intervals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dto::analysis::Sample;

/// Class labels reported by the classifier, in display order
pub const CLASS_LABELS: [&str; 7] = ["1", "2", "3", "4", "5", "6", "NC"];

/// Prediction the backend assigns to samples with a predominant subgroup
pub const PREDOMINANT_CLASS: u8 = 7;

/// Predicted class of one sample
///
/// The backend sends numeric classes as integers and the non-classified
/// marker as the string `"NC"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prediction {
    Class(u8),
    Label(String),
}

impl Prediction {
    /// True for samples reported under `AnalysisReport::predominant`
    pub fn is_predominant(&self) -> bool {
        matches!(self, Prediction::Class(PREDOMINANT_CLASS))
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Class(class) => write!(f, "{}", class),
            Prediction::Label(label) => f.write_str(label),
        }
    }
}

/// One classified sample from a bulk analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysedSample {
    #[serde(rename = "sampleID")]
    pub sample_id: String,
    /// Expression values, ordered like `AnalysisReport::gene_names`
    pub genes: Vec<f64>,
    pub prediction: Prediction,
    pub probs: Vec<f64>,
    /// Principal components; absent when too few samples were uploaded
    pub pca: Option<Vec<f64>>,
    pub typeid: String,
    #[serde(default)]
    pub predom_prediction: Option<Vec<u8>>,
    #[serde(default)]
    pub predom_probs: Option<Vec<f64>>,
}

/// Result of a bulk classification (`/analyse`) job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub samples: Vec<AnalysedSample>,
    pub invalid: u64,
    #[serde(default)]
    pub nc: u64,
    pub predominant: u64,
    pub gene_names: Vec<String>,
}

impl AnalysisReport {
    /// Counts samples per predicted class
    ///
    /// Every label in `CLASS_LABELS` is present, even with a zero count.
    /// Predominant samples are counted by `predominant` instead.
    pub fn prediction_summary(&self) -> BTreeMap<String, usize> {
        let mut summary: BTreeMap<String, usize> = CLASS_LABELS
            .iter()
            .map(|label| (label.to_string(), 0))
            .collect();

        for sample in self.samples.iter().filter(|s| !s.prediction.is_predominant()) {
            *summary.entry(sample.prediction.to_string()).or_insert(0) += 1;
        }

        summary
    }

    /// Rebuilds request samples (gene name to expression) for follow-up analyses
    pub fn to_samples(&self) -> Vec<Sample> {
        self.samples
            .iter()
            .map(|sample| Sample {
                sample_id: sample.sample_id.clone(),
                genes: self
                    .gene_names
                    .iter()
                    .cloned()
                    .zip(sample.genes.iter().map(|&value| value.into()))
                    .collect(),
            })
            .collect()
    }
}

/// One embedded sample from a t-SNE job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsnePoint {
    #[serde(rename = "sampleID")]
    pub sample_id: String,
    pub tsne: Vec<f64>,
}

/// Bootstrap confidence interval for one sample's top prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    #[serde(rename = "sampleID")]
    pub sample_id: String,
    pub min: f64,
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
    pub max: f64,
}
