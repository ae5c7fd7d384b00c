//! Logging setup

use tracing_subscriber::EnvFilter;

use crate::ConfigError;

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            default_filter:
                "whisper_runtime=info,whisper_state=info,whisper_author=info,warn".into(),
            json: false,
        }
    }
}

/// Install the global tracing subscriber.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ConfigError::Logging(e.to_string()))
}
