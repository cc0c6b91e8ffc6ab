//! Full report command
//!
//! Classifies a file, then runs t-SNE and confidence analyses concurrently.
//! Each analysis has its own cancellation token, so a failure or an
//! interrupt of one never changes how the other resolves.

use anyhow::{Context, Result};
use colored::*;
use oncoclass_client::AnalysisClient;
use oncoclass_core::dto::analysis::ConfidenceRequest;
use std::path::{Path, PathBuf};

use super::analyse::{analyse_file, print_analysis};
use super::followup::{print_confidence, print_tsne, run_confidence, run_tsne, tsne_request};
use crate::scope::Scope;
use crate::ui::write_json;

/// Options for the report command
pub struct ReportOptions {
    pub delimiter: String,
    pub perplexity: Option<u32>,
    pub dimensions: u32,
    pub interval: u32,
    pub output_dir: Option<PathBuf>,
}

/// Handle the report command
pub async fn handle_report(client: &AnalysisClient, file: &Path, options: ReportOptions) -> Result<()> {
    let mut scope = Scope::new();
    let analysis_token = scope.token();
    let tsne_token = scope.token();
    let confidence_token = scope.token();
    scope.cancel_on_interrupt();

    let report = analyse_file(client, file, &options.delimiter, &analysis_token).await?;
    print_analysis(&report);
    println!();

    if let Some(dir) = &options.output_dir {
        prepare_output_dir(dir)?;
        write_json(&dir.join("analysis.json"), &report)?;
    }

    let confidence_request = ConfidenceRequest {
        samples: report.to_samples(),
        interval: options.interval,
    };

    let (tsne, confidence) = match tsne_request(&report, options.perplexity, options.dimensions) {
        Ok(tsne_request) => {
            let (tsne, confidence) = tokio::join!(
                run_tsne(client, &tsne_request, &tsne_token),
                run_confidence(client, &confidence_request, &confidence_token),
            );
            (Some(tsne), confidence)
        }
        Err(e) => {
            println!("{} {}", "Skipping t-SNE:".yellow(), e);
            let confidence =
                run_confidence(client, &confidence_request, &confidence_token).await;
            (None, confidence)
        }
    };

    let mut failures = Vec::new();

    match tsne {
        Some(Ok(points)) => {
            println!();
            print_tsne(&points);
            if let Some(dir) = &options.output_dir {
                write_json(&dir.join("tsne.json"), &points)?;
            }
        }
        Some(Err(e)) => failures.push(e),
        None => {}
    }

    match confidence {
        Ok(intervals) => {
            println!();
            print_confidence(&intervals, options.interval);
            if let Some(dir) = &options.output_dir {
                write_json(&dir.join("confidence.json"), &intervals)?;
            }
        }
        Err(e) => failures.push(e),
    }

    if let Some(first) = failures.into_iter().next() {
        return Err(first.context("Report incomplete"));
    }

    Ok(())
}

/// Creates the report's output directory if it does not exist yet
fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
