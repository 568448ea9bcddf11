use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use super::config::AppConfig;
use super::error::AppError;

/// Install the global subscriber; all output goes to stderr
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init(config: &AppConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.log_json {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_ansi(false);
        registry.with(layer).try_init()
    } else {
        let layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()
    };

    installed.map_err(|e| AppError::Logging(e.to_string()))
}
