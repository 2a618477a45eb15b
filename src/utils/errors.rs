// src/utils/errors.rs
//! Engine error types
//!
//! Unrenderable entities are not errors: they produce empty text and are
//! skipped silently. Everything below is a genuine failure of a renderer,
//! the worker pool, or the engine's own setup.

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure reported by a [`Renderer`](crate::model::Renderer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct RenderError {
    pub reason: String,
}

impl RenderError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Engine-level errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Render failed for entity #{index}: {source}")]
    RenderFailed {
        index: usize,
        #[source]
        source: RenderError,
    },

    #[error("Render task for entity #{index} panicked: {message}")]
    TaskPanicked { index: usize, message: String },

    #[error("Failed to spawn worker pool: {0}")]
    PoolSpawnFailed(String),

    #[error("Worker pool unavailable: {0}")]
    PoolUnavailable(String),

    #[error("Observability setup failed: {0}")]
    Observability(String),
}

impl EngineError {
    /// Input index of the entity that caused this error, if any
    pub fn entity_index(&self) -> Option<usize> {
        match self {
            EngineError::RenderFailed { index, .. } | EngineError::TaskPanicked { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failed_display() {
        let err = EngineError::RenderFailed {
            index: 3,
            source: RenderError::new("no protocol body"),
        };
        assert_eq!(err.to_string(), "Render failed for entity #3: no protocol body");
        assert_eq!(err.entity_index(), Some(3));
    }

    #[test]
    fn test_entity_index_absent_for_setup_errors() {
        let err = EngineError::ConfigError("concurrency must be positive".into());
        assert!(err.entity_index().is_none());
    }
}
