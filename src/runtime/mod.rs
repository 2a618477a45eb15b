// src/runtime/mod.rs
//! Rendering runtime
//!
//! This module provides the machinery that fans entities out to workers:
//!
//! - **Dispatcher**: sequential and bounded execution, completion barrier
//! - **Permits**: counting permits enforcing the concurrency budget
//! - **Pool**: worker pools the bounded dispatcher submits to
//! - **Sink**: serialized delivery to the caller's callback
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     RenderEngine                         │
//! │                                                          │
//! │   Sequential ──► render ──► callback (input order)       │
//! │                                                          │
//! │   Bounded:                                               │
//! │     PermitPool(N) ──► WorkerPool ──► render ──┐          │
//! │          ▲                                    ▼          │
//! │          └───── permit dropped ◄── SerializedSink        │
//! │                                               │          │
//! │                 WaitGroup drains all tasks ◄──┘          │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dispatcher;
pub mod permits;
pub mod pool;
pub mod sink;

// Re-export commonly used types
pub use dispatcher::{ExecutionStrategy, FailurePolicy, RenderEngine, RenderStats};
pub use permits::{Permit, PermitPool};
pub use pool::{Job, ThreadPool, WorkerPool};
pub use sink::{CollectingSink, SerializedSink};
