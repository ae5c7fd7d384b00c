//! Session configuration

use std::time::Duration;

use thiserror::Error;
use whisper_author::DEFAULT_SUBMISSION_LATENCY;
use whisper_state::DEFAULT_MAX_CIRCLES;
use whisper_time::REFRESH_INTERVAL;

pub const ENV_SUBMISSION_LATENCY: &str = "WHISPER_SUBMISSION_LATENCY";
pub const ENV_TICK_INTERVAL: &str = "WHISPER_TICK_INTERVAL";
pub const ENV_MAX_CIRCLES: &str = "WHISPER_MAX_CIRCLES";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: invalid duration {value:?}: {source}")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("{var}: invalid number {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Session configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between accepting a submission and committing it
    pub submission_latency: Duration,
    /// Refresh cadence for live views
    pub tick_interval: Duration,
    /// Circle capacity
    pub max_circles: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            submission_latency: DEFAULT_SUBMISSION_LATENCY,
            tick_interval: REFRESH_INTERVAL,
            max_circles: DEFAULT_MAX_CIRCLES,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `WHISPER_*` environment variables.
    /// Durations use humantime syntax, e.g. `250ms` or `2s`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SessionConfig::default();

        if let Some(value) = lookup(ENV_SUBMISSION_LATENCY) {
            config.submission_latency = parse_duration(ENV_SUBMISSION_LATENCY, value)?;
        }
        if let Some(value) = lookup(ENV_TICK_INTERVAL) {
            config.tick_interval = parse_duration(ENV_TICK_INTERVAL, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_CIRCLES) {
            config.max_circles = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: ENV_MAX_CIRCLES,
                    value,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

fn parse_duration(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        var,
        value,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.submission_latency, Duration::from_secs(1));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.max_circles, 5);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_SUBMISSION_LATENCY, "250ms"),
            (ENV_TICK_INTERVAL, "2s"),
            (ENV_MAX_CIRCLES, " 3 "),
        ]))
        .unwrap();
        assert_eq!(config.submission_latency, Duration::from_millis(250));
        assert_eq!(config.tick_interval, Duration::from_secs(2));
        assert_eq!(config.max_circles, 3);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = SessionConfig::from_lookup(lookup(&[(ENV_TICK_INTERVAL, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { var: ENV_TICK_INTERVAL, .. }));

        let err = SessionConfig::from_lookup(lookup(&[(ENV_MAX_CIRCLES, "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = SessionConfig::from_lookup(lookup(&[(ENV_TICK_INTERVAL, "0s")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTickInterval));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_SUBMISSION_LATENCY, "0s");
        std::env::remove_var(ENV_TICK_INTERVAL);
        std::env::remove_var(ENV_MAX_CIRCLES);

        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.submission_latency, Duration::ZERO);
        assert_eq!(config.tick_interval, REFRESH_INTERVAL);

        std::env::remove_var(ENV_SUBMISSION_LATENCY);
    }
}
