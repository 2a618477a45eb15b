// src/lib.rs
//! Mockgen Rendering Engine
//!
//! Renders already-resolved entities into mock implementations, one artifact
//! per entity, and hands each finished artifact to a caller-supplied
//! callback.
//!
//! # Architecture
//!
//! The engine is structured into several key modules:
//!
//! - **model**: the entity → text rendering contract
//! - **mock**: mock-class renderer for resolved protocol entities
//! - **runtime**: sequential and bounded-concurrency execution
//! - **observability**: tracing setup
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! use mockgen_engine::mock::{EntityModel, Member, MockRenderer, ResolvedEntity};
//! use mockgen_engine::runtime::CollectingSink;
//! use mockgen_engine::{EngineConfig, RenderEngine};
//! use std::sync::Arc;
//!
//! # fn main() -> mockgen_engine::Result<()> {
//! let engine = RenderEngine::from_config(&EngineConfig::bounded(4))?;
//! let entities = vec![ResolvedEntity::new(
//!     EntityModel::new("Store", 0).with_member(Member::variable("count", "Int")),
//! )];
//!
//! let output = CollectingSink::new();
//! engine.render(entities, Arc::new(MockRenderer::new()), output.callback())?;
//!
//! for (mock, _offset) in output.into_sorted() {
//!     println!("{}", mock);
//! }
//! # Ok(())
//! # }
//! ```

// Public module exports
pub mod mock;
pub mod model;
pub mod observability;
pub mod runtime;
pub mod utils;

// Re-export commonly used types
pub use model::{RenderResult, Renderer};
pub use runtime::dispatcher::{ExecutionStrategy, FailurePolicy, RenderEngine, RenderStats};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, RenderError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
