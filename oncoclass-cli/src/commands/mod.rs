//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod analyse;
mod followup;
mod report;

use anyhow::Result;
use clap::Subcommand;
use oncoclass_client::{AnalysisClient, AsyncJobRunner};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::ui::TerminalNotifier;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload a sample file for classification
    Analyse {
        /// CSV or TXT file of gene expression values
        file: PathBuf,

        /// Column delimiter ("tab" for tab-separated files)
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Save the full analysis as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Embed previously analysed samples with t-SNE
    Tsne {
        /// Analysis JSON saved by `analyse --output`
        #[arg(long)]
        report: PathBuf,

        /// Perplexity (default: the largest the sample count allows)
        #[arg(long)]
        perplexity: Option<u32>,

        /// Number of embedding dimensions
        #[arg(long, default_value_t = 2)]
        dimensions: u32,

        /// Save the embedding as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute prediction confidence intervals for previously analysed samples
    Confidence {
        /// Analysis JSON saved by `analyse --output`
        #[arg(long)]
        report: PathBuf,

        /// Interval width in percent
        #[arg(long, default_value_t = 95)]
        interval: u32,

        /// Save the intervals as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Classify a file, then run t-SNE and confidence analyses side by side
    Report {
        /// CSV or TXT file of gene expression values
        file: PathBuf,

        /// Column delimiter ("tab" for tab-separated files)
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// t-SNE perplexity (default: the largest the sample count allows)
        #[arg(long)]
        perplexity: Option<u32>,

        /// Number of t-SNE dimensions
        #[arg(long, default_value_t = 2)]
        dimensions: u32,

        /// Confidence interval width in percent
        #[arg(long, default_value_t = 95)]
        interval: u32,

        /// Directory to save analysis.json, tsne.json and confidence.json in
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = analysis_client(config);

    match command {
        Commands::Analyse {
            file,
            delimiter,
            output,
        } => analyse::handle_analyse(&client, &file, &parse_delimiter(&delimiter), output).await,
        Commands::Tsne {
            report,
            perplexity,
            dimensions,
            output,
        } => followup::handle_tsne(&client, &report, perplexity, dimensions, output).await,
        Commands::Confidence {
            report,
            interval,
            output,
        } => followup::handle_confidence(&client, &report, interval, output).await,
        Commands::Report {
            file,
            delimiter,
            perplexity,
            dimensions,
            interval,
            output_dir,
        } => {
            let options = report::ReportOptions {
                delimiter: parse_delimiter(&delimiter),
                perplexity,
                dimensions,
                interval,
                output_dir,
            };
            report::handle_report(&client, &file, options).await
        }
    }
}

/// Builds the analysis client every command shares
fn analysis_client(config: &Config) -> AnalysisClient {
    let runner = AsyncJobRunner::http(config.poll.clone(), Arc::new(TerminalNotifier));
    AnalysisClient::new(config.api_url.clone(), runner)
}

/// Accepts "tab" and a literal "\t" as names for the tab delimiter
fn parse_delimiter(raw: &str) -> String {
    match raw {
        "tab" | "\\t" => "\t".to_string(),
        other => other.to_string(),
    }
}
