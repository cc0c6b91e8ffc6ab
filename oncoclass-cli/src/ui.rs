//! Terminal presentation helpers
//!
//! Failure notifications, result output and conversion of job outcomes into
//! typed results.

use anyhow::{Context, Result, bail};
use colored::*;
use oncoclass_client::{JobOutcome, Notifier};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Prints failure messages to stderr, the terminal's warning dialog
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

/// Extracts typed results from a finished job
///
/// Cancelled and failed jobs become errors; the user has already been
/// notified of failures, so the error only names the analysis and the kind.
pub fn results_of<T: DeserializeOwned>(outcome: JobOutcome, analysis: &str) -> Result<T> {
    if outcome.is_cancelled() {
        bail!("{} cancelled", analysis);
    }

    let reason = outcome.reason;
    match outcome.into_results::<T>() {
        Some(parsed) => parsed.with_context(|| format!("Unexpected {} result format", analysis)),
        None => bail!("{} failed ({:?})", analysis, reason),
    }
}

/// Writes `value` as pretty JSON to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Saved results to".dimmed(), path.display());
    Ok(())
}

/// Reads JSON of type `T` from `path`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
