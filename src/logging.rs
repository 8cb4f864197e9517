//! Tracing subscriber setup for hosts embedding the search core.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{AppError, Result};

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `config.filter`.
///
/// # Errors
///
/// `INTERNAL` if the filter does not parse or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(config)?;

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|err| AppError::internal(format!("install tracing subscriber: {err}")))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|err| AppError::internal(format!("invalid log filter {}: {err}", config.filter)))
}
