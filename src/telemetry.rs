use crate::config::LoggingSettings;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. The format is
/// `json` unless configured as `pretty`.
pub fn init(config: &LoggingSettings) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|source| TelemetryError::EnvFilter {
            value: config.level.clone(),
            source,
        })?,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true);

    if config.format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.json().try_init()
    }
    .map_err(TelemetryError::Subscriber)
}
