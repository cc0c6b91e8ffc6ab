//! Oncoclass CLI
//!
//! Command-line front end for the Oncoclass analysis API: uploads sample
//! files for classification and runs follow-up analyses (t-SNE, confidence
//! intervals) on the results.

mod commands;
mod config;
mod scope;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use oncoclass_client::PollConfig;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oncoclass")]
#[command(about = "Cancer sample classification CLI", long_about = None)]
struct Cli {
    /// Analysis API URL
    #[arg(long, env = "ONCOCLASS_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Delay between result polls, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Give up on a job after this many seconds (default: wait indefinitely)
    #[arg(long)]
    max_wait_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oncoclass=info,oncoclass_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut poll = PollConfig::from_env().context("Invalid polling configuration")?;
    if let Some(ms) = cli.poll_interval_ms {
        poll.interval = Duration::from_millis(ms);
        poll.max_interval = poll.max_interval.max(poll.interval);
    }
    if let Some(secs) = cli.max_wait_secs {
        poll.max_wait = Some(Duration::from_secs(secs));
    }
    poll.validate().context("Invalid polling configuration")?;

    let config = Config {
        api_url: cli.api_url,
        poll,
    };

    handle_command(cli.command, &config).await
}
