// src/utils/config.rs
//! Engine configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults (sequential rendering, skip failures, `info` logs)
//! 2. Optional `mockgen.{toml,yaml,json}` in the working directory
//! 3. `MOCKGEN__*` environment variables (e.g. `MOCKGEN__CONCURRENCY=8`,
//!    `MOCKGEN__LOG__FORMAT=json`)

use crate::runtime::dispatcher::FailurePolicy;
use crate::utils::errors::{EngineError, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum entities rendering at once; `None` renders on the calling thread
    pub concurrency: Option<usize>,

    /// Threads in the built-in worker pool (defaults to `concurrency`)
    pub worker_threads: Option<usize>,

    /// What a failing renderer does to the rest of the batch
    pub failure_policy: FailurePolicy,

    /// Logging settings
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl EngineConfig {
    /// Configuration for single-threaded rendering
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Configuration for rendering with at most `concurrency` entities in flight
    pub fn bounded(concurrency: usize) -> Self {
        Self {
            concurrency: Some(concurrency),
            ..Default::default()
        }
    }

    /// Load from `mockgen.*` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder().add_source(File::with_name("mockgen").required(false)),
        )
    }

    /// Load from a specific file, then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::from(path.as_ref()).required(true)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix("MOCKGEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == Some(0) {
            return Err(EngineError::ConfigError(
                "concurrency must be at least 1 (omit it for sequential rendering)".to_string(),
            ));
        }

        if self.worker_threads == Some(0) {
            return Err(EngineError::ConfigError(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        if self.log.filter.trim().is_empty() {
            return Err(EngineError::ConfigError("log filter cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Size of the worker pool to build, if rendering is concurrent
    pub fn effective_worker_threads(&self) -> Option<usize> {
        self.concurrency
            .map(|budget| self.worker_threads.unwrap_or(budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("mockgen")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.concurrency.is_none());
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::bounded(0).validate().is_err());

        let no_threads = EngineConfig {
            worker_threads: Some(0),
            ..EngineConfig::bounded(4)
        };
        assert!(no_threads.validate().is_err());

        assert!(EngineConfig::bounded(4).validate().is_ok());
    }

    #[test]
    fn test_effective_worker_threads() {
        assert_eq!(EngineConfig::sequential().effective_worker_threads(), None);
        assert_eq!(EngineConfig::bounded(6).effective_worker_threads(), Some(6));

        let explicit = EngineConfig {
            worker_threads: Some(2),
            ..EngineConfig::bounded(6)
        };
        assert_eq!(explicit.effective_worker_threads(), Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
concurrency = 4
worker_threads = 2
failure_policy = "fail_fast"

[log]
filter = "mockgen_engine=debug"
format = "json"
"#,
        );

        let config = EngineConfig::load_from(file.path()).unwrap();
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.worker_threads, Some(2));
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.log.filter, "mockgen_engine=debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_file_rejects_zero_budget() {
        let file = write_config("concurrency = 0\n");

        let err = EngineConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = EngineConfig::load_from("/nonexistent/mockgen.toml").unwrap_err();
        assert!(matches!(err, EngineError::ConfigLoad(_)));
    }
}
