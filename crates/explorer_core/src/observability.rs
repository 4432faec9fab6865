//! Tracing subscriber initialization.

use explorer_error::ConfigError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `default_filter`.
/// Logs are written to stderr so streamed answers on stdout stay clean.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the filter is malformed or a subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| ConfigError::new(format!("Invalid log filter '{}': {}", default_filter, e)))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    debug!(format = %format, "Tracing initialized");
    Ok(())
}
