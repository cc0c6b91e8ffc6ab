//! Bulk classification command
//!
//! Uploads a sample file and prints a per-class summary of the predictions.

use anyhow::{Context, Result};
use colored::*;
use oncoclass_client::{AnalysisClient, CancellationToken};
use oncoclass_core::domain::analysis::AnalysisReport;
use std::path::{Path, PathBuf};

use crate::scope::Scope;
use crate::ui::{results_of, write_json};

/// Handle the analyse command
pub async fn handle_analyse(
    client: &AnalysisClient,
    file: &Path,
    delimiter: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut scope = Scope::new();
    let token = scope.token();
    scope.cancel_on_interrupt();

    let report = analyse_file(client, file, delimiter, &token).await?;
    print_analysis(&report);

    if let Some(path) = output {
        write_json(&path, &report)?;
    }

    Ok(())
}

/// Uploads `file` and waits for its classification
pub async fn analyse_file(
    client: &AnalysisClient,
    file: &Path,
    delimiter: &str,
    token: &CancellationToken,
) -> Result<AnalysisReport> {
    let contents =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "samples.csv".to_string());

    println!(
        "{} {} ({} bytes)",
        "Uploading".cyan(),
        file_name.bold(),
        contents.len()
    );

    let outcome = client.analyse(&file_name, contents, delimiter, token).await;
    results_of(outcome, "Analysis")
}

/// Print the per-class summary of an analysis
pub fn print_analysis(report: &AnalysisReport) {
    println!(
        "{}",
        format!("Classified {} sample(s):", report.samples.len()).bold()
    );

    for (label, count) in report.prediction_summary() {
        let label = if label == "NC" {
            "Not classified".to_string()
        } else {
            format!("Class {}", label)
        };
        println!("  {:<16} {}", label, count.to_string().cyan());
    }

    println!();
    println!("  Predominant:     {}", report.predominant);
    if report.invalid > 0 {
        println!(
            "  {}",
            format!("Invalid samples skipped: {}", report.invalid).yellow()
        );
    }
}
