// src/model/mod.rs
//! Rendering contract
//!
//! An entity is opaque to the engine. A [`Renderer`] turns one entity into a
//! [`RenderResult`]; empty text means "nothing to deliver" and is never
//! reported as a failure.

use crate::utils::errors::RenderError;

/// Output of rendering one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered text, possibly empty
    pub text: String,

    /// Stable locator (e.g. source byte offset) callers use to order results
    pub position: i64,
}

impl RenderResult {
    pub fn new(text: impl Into<String>, position: i64) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }

    /// A result that produces no sink invocation
    pub fn empty(position: i64) -> Self {
        Self {
            text: String::new(),
            position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Maps one entity to its rendered text.
///
/// Implementations are shared by every worker of a batch, so they must not
/// mutate state visible to other invocations.
pub trait Renderer<E>: Send + Sync + 'static {
    fn render(&self, entity: &E) -> Result<RenderResult, RenderError>;
}

impl<E, F> Renderer<E> for F
where
    F: Fn(&E) -> Result<RenderResult, RenderError> + Send + Sync + 'static,
{
    fn render(&self, entity: &E) -> Result<RenderResult, RenderError> {
        self(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = RenderResult::empty(42);
        assert!(result.is_empty());
        assert_eq!(result.position, 42);
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = |n: &u32| -> Result<RenderResult, RenderError> {
            Ok(RenderResult::new(format!("mock{}", n), i64::from(*n)))
        };

        let result = Renderer::<u32>::render(&renderer, &7).unwrap();
        assert_eq!(result, RenderResult::new("mock7", 7));
    }
}
