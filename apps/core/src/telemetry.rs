//! Tracing subscriber setup.
//!
//! Logs go to stderr: stdout belongs to the console transport.

use crate::config::LogFormat;
use crate::error::AppError;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

const APP_NAME: &str = "octoplay";

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_subscriber(format: LogFormat) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            let subscriber = Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(APP_NAME.into(), std::io::stderr));
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| AppError::Internal(format!("Failed to install subscriber: {}", e)))
        }
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| AppError::Internal(format!("Failed to install subscriber: {}", e))),
    }
}
