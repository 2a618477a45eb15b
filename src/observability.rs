// src/observability.rs
//! Tracing setup
//!
//! The engine logs through `tracing`; binaries embedding it call
//! [`init_tracing`] once at startup. `RUST_LOG` overrides the configured
//! filter.

use crate::utils::config::{LogConfig, LogFormat};
use crate::utils::errors::{EngineError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_thread_names(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
    };

    installed.map_err(|e| EngineError::Observability(format!("Failed to install subscriber: {}", e)))
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            EngineError::Observability(format!("Invalid log filter '{}': {}", config.filter, e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let config = LogConfig::default();
        // Another test may have installed a subscriber first; either way the
        // second attempt in this process must fail cleanly.
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(EngineError::Observability(_))
        ));
    }
}
