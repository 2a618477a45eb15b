// src/mock/mod.rs
//! Mock generation for resolved protocol entities
//!
//! - **Entity**: protocol declarations with inherited requirements
//! - **Template**: [`MockRenderer`], the [`Renderer`](crate::model::Renderer)
//!   used for mock output
//! - **Defaults**: literal defaults for well-known type names

pub mod defaults;
pub mod entity;
pub mod template;

pub use defaults::{capitalize_first_letter, default_value};
pub use entity::{EntityModel, Member, Param, ResolvedEntity};
pub use template::MockRenderer;
