// src/runtime/pool.rs
//! Worker pools that execute render tasks
//!
//! The engine only bounds how many of its tasks are in flight; the threads
//! themselves come from a [`WorkerPool`]. Two implementations are provided:
//!
//! - [`ThreadPool`]: fixed set of named OS threads fed by a shared
//!   `crossbeam-channel` queue
//! - `tokio::runtime::Handle`: jobs run on tokio's blocking thread pool
//!
//! # Architecture
//!
//! ```text
//! execute(job) ──► [unbounded queue] ──► worker-0 ─┐
//!                                   ├──► worker-1 ─┼─► job()
//!                                   └──► worker-N ─┘
//! ```

use crate::utils::errors::{EngineError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// A unit of work handed to a pool
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes jobs on threads other than the caller's
pub trait WorkerPool: Send + Sync {
    /// Queue a job for execution.
    ///
    /// When the pool refuses the job it is dropped without running.
    fn execute(&self, job: Job) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Fixed-size pool of OS threads
pub struct ThreadPool {
    /// Job queue; `None` once shutdown has begun
    sender: Option<Sender<Job>>,

    /// Worker thread handles
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `size` worker threads
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EngineError::ConfigError(
                "Worker pool needs at least one thread".to_string(),
            ));
        }

        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);

        for worker_id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("mockgen-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_id, receiver))
                .map_err(|e| {
                    EngineError::PoolSpawnFailed(format!(
                        "Failed to spawn worker #{}: {}",
                        worker_id, e
                    ))
                })?;
            workers.push(handle);
        }

        debug!("Thread pool started with {} workers", size);

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl WorkerPool for ThreadPool {
    fn execute(&self, job: Job) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| EngineError::PoolUnavailable("Thread pool is shutting down".into()))?;

        sender
            .send(job)
            .map_err(|_| EngineError::PoolUnavailable("Thread pool queue closed".into()))
    }

    fn name(&self) -> &str {
        "thread-pool"
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Closing the queue lets every worker drain it and exit.
        drop(self.sender.take());

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread exited abnormally");
            }
        }

        debug!("Thread pool stopped");
    }
}

fn worker_loop(worker_id: usize, receiver: Receiver<Job>) {
    trace!("Worker {} started", worker_id);

    while let Ok(job) = receiver.recv() {
        // A panicking job must not take the worker down with it.
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            warn!("Worker {} recovered from a panicking job", worker_id);
        }
    }

    trace!("Worker {} stopped", worker_id);
}

/// Job wrapper that records whether it was dropped before running
struct TrackedJob {
    job: Option<Job>,
    dropped_unrun: Arc<AtomicBool>,
}

impl TrackedJob {
    fn run(mut self) {
        if let Some(job) = self.job.take() {
            job();
        }
    }
}

impl Drop for TrackedJob {
    fn drop(&mut self) {
        if self.job.is_some() {
            self.dropped_unrun.store(true, Ordering::Release);
        }
    }
}

impl WorkerPool for tokio::runtime::Handle {
    fn execute(&self, job: Job) -> Result<()> {
        let dropped_unrun = Arc::new(AtomicBool::new(false));
        let tracked = TrackedJob {
            job: Some(job),
            dropped_unrun: Arc::clone(&dropped_unrun),
        };

        // Detached: completion is tracked by the dispatcher, not the JoinHandle.
        // A runtime that is shutting down cancels the task on the spot.
        let _ = self.spawn_blocking(move || tracked.run());

        if dropped_unrun.load(Ordering::Acquire) {
            return Err(EngineError::PoolUnavailable(
                "Tokio runtime is shut down".to_string(),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tokio-blocking"
    }
}
