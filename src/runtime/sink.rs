// src/runtime/sink.rs
//! Completion sinks
//!
//! [`SerializedSink`] funnels concurrent deliveries through one mutex so the
//! caller's callback never runs twice at once. The lock covers the callback
//! only; rendering happens outside it.
//!
//! [`CollectingSink`] is a ready-made callback that keeps every delivery and
//! hands them back ordered by position.

use parking_lot::Mutex;
use std::sync::Arc;

/// Caller callback shared by all workers of a batch, invoked under exclusion
pub struct SerializedSink<F> {
    callback: Arc<Mutex<F>>,
}

impl<F> SerializedSink<F>
where
    F: FnMut(String, i64) + Send,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback: Arc::new(Mutex::new(callback)),
        }
    }

    /// Deliver one rendered artifact
    pub fn deliver(&self, text: String, position: i64) {
        let mut callback = self.callback.lock();
        (*callback)(text, position);
    }
}

impl<F> Clone for SerializedSink<F> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Accumulates `(text, position)` pairs from any number of threads
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    entries: Arc<Mutex<Vec<(String, i64)>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback suitable for passing to the engine
    pub fn callback(&self) -> impl FnMut(String, i64) + Send + 'static {
        let entries = Arc::clone(&self.entries);
        move |text, position| entries.lock().push((text, position))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Deliveries in arrival order
    pub fn entries(&self) -> Vec<(String, i64)> {
        self.entries.lock().clone()
    }

    /// Deliveries ordered by position; arrival order breaks ties
    pub fn into_sorted(self) -> Vec<(String, i64)> {
        let mut entries = std::mem::take(&mut *self.entries.lock());
        entries.sort_by_key(|(_, position)| *position);
        entries
    }
}
