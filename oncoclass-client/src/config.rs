//! Polling configuration
//!
//! Defines the cadence of result polling, the status code the backend uses
//! to signal "still processing", and the optional backoff and wait limits.

use std::time::Duration;

/// Default delay between status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Status code the backend answers with while a job is still running
pub const DEFAULT_PENDING_STATUS: u16 = 201;

/// Result polling configuration
///
/// The defaults reproduce a fixed two-second cadence with no overall limit.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Delay between the settling of one status request and the next
    pub interval: Duration,

    /// Status code meaning "still processing"
    pub pending_status: u16,

    /// Multiplier applied to the delay after each pending tick (1.0 keeps it fixed)
    pub backoff_factor: f64,

    /// Upper bound for the delay once backoff is applied
    pub max_interval: Duration,

    /// Give up after this long without a terminal status (`None` waits forever)
    pub max_wait: Option<Duration>,
}

impl PollConfig {
    /// Creates a configuration with a fixed interval and defaults elsewhere
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Enables bounded exponential backoff
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    /// Stops polling after `max_wait` without a terminal status
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - ONCOCLASS_POLL_INTERVAL_MS (default: 2000)
    /// - ONCOCLASS_PENDING_STATUS (default: 201)
    /// - ONCOCLASS_BACKOFF_FACTOR (default: 1.0)
    /// - ONCOCLASS_MAX_INTERVAL_MS (default: 30000)
    /// - ONCOCLASS_MAX_WAIT_SECS (default: unset, no limit)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let interval = env_parse::<u64>("ONCOCLASS_POLL_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.interval);

        let pending_status =
            env_parse::<u16>("ONCOCLASS_PENDING_STATUS")?.unwrap_or(defaults.pending_status);

        let backoff_factor =
            env_parse::<f64>("ONCOCLASS_BACKOFF_FACTOR")?.unwrap_or(defaults.backoff_factor);

        let max_interval = env_parse::<u64>("ONCOCLASS_MAX_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_interval);

        let max_wait = env_parse::<u64>("ONCOCLASS_MAX_WAIT_SECS")?.map(Duration::from_secs);

        let config = Self {
            interval,
            pending_status,
            backoff_factor,
            max_interval,
            max_wait,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval.is_zero() {
            anyhow::bail!("poll interval must be greater than 0");
        }

        if !(100..400).contains(&self.pending_status) {
            anyhow::bail!(
                "pending status {} must not be an error status",
                self.pending_status
            );
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            anyhow::bail!("backoff factor must be at least 1.0");
        }

        if self.max_interval < self.interval {
            anyhow::bail!("max interval must not be shorter than the poll interval");
        }

        if self.max_wait.is_some_and(|wait| wait.is_zero()) {
            anyhow::bail!("max wait must be greater than 0 when set");
        }

        Ok(())
    }

    /// Delay to use after a pending tick that waited `current`
    ///
    /// Never exceeds `max_interval`, including when the product overflows
    /// `Duration`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_factor.is_nan() || self.backoff_factor <= 1.0 {
            return current;
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_factor)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            pending_status: DEFAULT_PENDING_STATUS,
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(30),
            max_wait: None,
        }
    }
}

/// Reads and parses an optional environment variable
fn env_parse<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_millis(2000));
        assert_eq!(config.pending_status, 201);
        assert!(config.max_wait.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = PollConfig::default();

        config.interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.interval = Duration::from_millis(500);

        config.pending_status = 500;
        assert!(config.validate().is_err());
        config.pending_status = 202;
        assert!(config.validate().is_ok());

        config.backoff_factor = 0.5;
        assert!(config.validate().is_err());
        config.backoff_factor = 2.0;

        config.max_interval = Duration::from_millis(100);
        assert!(config.validate().is_err());
        config.max_interval = Duration::from_secs(10);

        config.max_wait = Some(Duration::ZERO);
        assert!(config.validate().is_err());
        config.max_wait = Some(Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_interval_never_grows() {
        let config = PollConfig::with_interval(Duration::from_secs(2));
        assert_eq!(
            config.next_interval(Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_backoff_is_bounded() {
        let config = PollConfig::with_interval(Duration::from_secs(1))
            .with_backoff(2.0, Duration::from_secs(5));

        let mut delay = config.interval;
        let mut seen = Vec::new();
        for _ in 0..5 {
            delay = config.next_interval(delay);
            seen.push(delay.as_secs());
        }
        assert_eq!(seen, vec![2, 4, 5, 5, 5]);
    }

    #[test]
    fn test_huge_backoff_factor_saturates() {
        let config = PollConfig::with_interval(Duration::from_secs(2))
            .with_backoff(1e30, Duration::from_secs(30));
        assert!(config.validate().is_ok());

        assert_eq!(
            config.next_interval(Duration::from_secs(2)),
            Duration::from_secs(30)
        );
        assert_eq!(
            config.next_interval(Duration::from_secs(30)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_nan_backoff_keeps_interval() {
        let mut config = PollConfig::with_interval(Duration::from_secs(2));
        config.backoff_factor = f64::NAN;

        assert!(config.validate().is_err());
        assert_eq!(
            config.next_interval(Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_from_env() {
        const VARS: [&str; 5] = [
            "ONCOCLASS_POLL_INTERVAL_MS",
            "ONCOCLASS_PENDING_STATUS",
            "ONCOCLASS_BACKOFF_FACTOR",
            "ONCOCLASS_MAX_INTERVAL_MS",
            "ONCOCLASS_MAX_WAIT_SECS",
        ];

        // One test owns all of these variables, so no other test races on them
        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
        }
        assert_eq!(PollConfig::from_env().unwrap(), PollConfig::default());

        unsafe {
            std::env::set_var("ONCOCLASS_POLL_INTERVAL_MS", "500");
            std::env::set_var("ONCOCLASS_BACKOFF_FACTOR", "1.5");
            std::env::set_var("ONCOCLASS_MAX_WAIT_SECS", "60");
        }
        let config = PollConfig::from_env().unwrap();
        assert_eq!(config.interval, Duration::from_millis(500));
        assert_eq!(config.backoff_factor, 1.5);
        assert_eq!(config.max_wait, Some(Duration::from_secs(60)));
        assert_eq!(config.pending_status, DEFAULT_PENDING_STATUS);

        unsafe {
            std::env::set_var("ONCOCLASS_PENDING_STATUS", "abc");
        }
        let err = PollConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("ONCOCLASS_PENDING_STATUS"));

        unsafe {
            std::env::set_var("ONCOCLASS_PENDING_STATUS", "500");
        }
        assert!(PollConfig::from_env().is_err());

        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
        }
    }
}
