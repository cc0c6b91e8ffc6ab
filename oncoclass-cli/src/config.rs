//! Configuration module
//!
//! Handles CLI configuration: the analysis API location and how results are polled.

use oncoclass_client::PollConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis API
    pub api_url: String,

    /// Result polling settings
    pub poll: PollConfig,
}
