//! Structured logging initialization.
//!
//! The decoder only emits `tracing` events. Hosting processes that want
//! them printed call [`init`] once at startup. The RUST_LOG environment
//! variable takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Logging setup errors.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a global subscriber built from `config`.
///
/// Fails if the level directive does not parse or a global subscriber is
/// already set.
///
/// # Example
///
/// ```no_run
/// use h2_frame::config::LoggingConfig;
///
/// h2_frame::logging::init(&LoggingConfig::default()).unwrap();
/// tracing::info!("decoder ready");
/// ```
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = filter(config)?;

    match (config.format, config.timestamps) {
        (LogFormat::Pretty, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(true).with_target(true))
            .try_init()?,
        (LogFormat::Pretty, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(true).with_target(true).without_time())
            .try_init()?,
        (LogFormat::Compact, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(true))
            .try_init()?,
        (LogFormat::Compact, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(true).without_time())
            .try_init()?,
        (LogFormat::Json, true) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
        (LogFormat::Json, false) => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).without_time())
            .try_init()?,
    }

    Ok(())
}

fn filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if std::env::var("RUST_LOG").is_ok() {
        return Ok(EnvFilter::from_default_env());
    }
    Ok(EnvFilter::try_new(&config.level)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_once() {
        let config = LoggingConfig {
            level: "off".to_string(),
            format: LogFormat::Compact,
            timestamps: false,
        };

        // Another test binary may share the process-wide subscriber slot, so
        // only the second call is guaranteed to fail.
        let _ = init(&config);
        assert!(matches!(init(&config), Err(LoggingError::Init(_))));
    }
}
