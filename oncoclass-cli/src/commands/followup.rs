//! Follow-up analysis commands
//!
//! t-SNE embedding and confidence intervals, both run on samples from a
//! saved bulk analysis.

use anyhow::{Result, bail};
use colored::*;
use oncoclass_client::analysis::max_perplexity;
use oncoclass_client::{AnalysisClient, CancellationToken};
use oncoclass_core::domain::analysis::{AnalysisReport, ConfidenceInterval, TsnePoint};
use oncoclass_core::dto::analysis::{ConfidenceRequest, TsneRequest};
use std::path::{Path, PathBuf};

use crate::scope::Scope;
use crate::ui::{read_json, results_of, write_json};

/// Handle the tsne command
pub async fn handle_tsne(
    client: &AnalysisClient,
    report: &Path,
    perplexity: Option<u32>,
    dimensions: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let report: AnalysisReport = read_json(report)?;
    let request = tsne_request(&report, perplexity, dimensions)?;

    let mut scope = Scope::new();
    let token = scope.token();
    scope.cancel_on_interrupt();

    let points = run_tsne(client, &request, &token).await?;
    print_tsne(&points);

    if let Some(path) = output {
        write_json(&path, &points)?;
    }

    Ok(())
}

/// Handle the confidence command
pub async fn handle_confidence(
    client: &AnalysisClient,
    report: &Path,
    interval: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let report: AnalysisReport = read_json(report)?;
    let request = ConfidenceRequest {
        samples: report.to_samples(),
        interval,
    };

    let mut scope = Scope::new();
    let token = scope.token();
    scope.cancel_on_interrupt();

    let intervals = run_confidence(client, &request, &token).await?;
    print_confidence(&intervals, interval);

    if let Some(path) = output {
        write_json(&path, &intervals)?;
    }

    Ok(())
}

/// Builds a t-SNE request, defaulting perplexity to the largest allowed
pub fn tsne_request(
    report: &AnalysisReport,
    perplexity: Option<u32>,
    dimensions: u32,
) -> Result<TsneRequest> {
    let perplexity = match perplexity.or_else(|| max_perplexity(report.samples.len())) {
        Some(perplexity) => perplexity,
        None => bail!(
            "t-SNE needs at least 3 samples, the analysis has {}",
            report.samples.len()
        ),
    };

    Ok(TsneRequest {
        samples: report.to_samples(),
        perplexity,
        num_dimensions: dimensions,
    })
}

pub async fn run_tsne(
    client: &AnalysisClient,
    request: &TsneRequest,
    token: &CancellationToken,
) -> Result<Vec<TsnePoint>> {
    println!(
        "{} (perplexity {}, {} dimensions)",
        "Running t-SNE".cyan(),
        request.perplexity,
        request.num_dimensions
    );
    results_of(client.tsne(request, token).await, "t-SNE")
}

pub async fn run_confidence(
    client: &AnalysisClient,
    request: &ConfidenceRequest,
    token: &CancellationToken,
) -> Result<Vec<ConfidenceInterval>> {
    println!(
        "{} ({}% interval)",
        "Computing confidence intervals".cyan(),
        request.interval
    );
    results_of(client.confidence(request, token).await, "Confidence")
}

/// Print t-SNE coordinates, one sample per line
pub fn print_tsne(points: &[TsnePoint]) {
    println!("{}", format!("t-SNE embedding of {} sample(s):", points.len()).bold());
    for point in points {
        let coords: Vec<String> = point.tsne.iter().map(|c| format!("{:.3}", c)).collect();
        println!("  {} [{}]", point.sample_id.dimmed(), coords.join(", "));
    }
}

/// Print confidence intervals, one sample per line
pub fn print_confidence(intervals: &[ConfidenceInterval], width: u32) {
    println!(
        "{}",
        format!("{}% confidence intervals for {} sample(s):", width, intervals.len()).bold()
    );
    for interval in intervals {
        println!(
            "  {} median {:.3}  [{:.3} .. {:.3}]  range {:.3}..{:.3}",
            interval.sample_id.dimmed(),
            interval.median,
            interval.lower,
            interval.upper,
            interval.min,
            interval.max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(samples: usize) -> AnalysisReport {
        let samples: Vec<_> = (0..samples)
            .map(|i| {
                json!({
                    "sampleID": format!("S{}", i),
                    "genes": [1.0, 2.0],
                    "prediction": 1,
                    "probs": [1.0],
                    "pca": null,
                    "typeid": "None"
                })
            })
            .collect();
        serde_json::from_value(json!({
            "samples": samples,
            "invalid": 0,
            "nc": 0,
            "predominant": 0,
            "geneNames": ["A", "B"]
        }))
        .unwrap()
    }

    #[test]
    fn test_tsne_request_defaults_perplexity() {
        let request = tsne_request(&report(4), None, 2).unwrap();
        assert_eq!(request.perplexity, 3);
        assert_eq!(request.samples.len(), 4);
    }

    #[test]
    fn test_tsne_request_keeps_explicit_perplexity() {
        let request = tsne_request(&report(10), Some(5), 3).unwrap();
        assert_eq!(request.perplexity, 5);
        assert_eq!(request.num_dimensions, 3);
    }

    #[test]
    fn test_tsne_request_needs_samples() {
        assert!(tsne_request(&report(2), None, 2).is_err());
    }
}
