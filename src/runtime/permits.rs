// src/runtime/permits.rs
//! Counting permit pool bounding in-flight render tasks
//!
//! The dispatcher takes a permit *before* handing a task to the worker pool,
//! so the budget bounds pending tasks as well as running ones. Acquisition
//! blocks the submitting thread while every permit is held (backpressure).
//!
//! ```text
//! submit ── acquire() ──► [Permit] ──► task body ──► drop(Permit) ──► release
//!              ▲                                                        │
//!              └──────────────── wakes one waiter ◄─────────────────────┘
//! ```

use parking_lot::{Condvar, Mutex};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

/// Fixed-capacity pool of render permits
#[derive(Debug)]
pub struct PermitPool {
    /// Permits currently free
    available: Mutex<usize>,

    /// Signalled whenever a permit is returned
    released: Condvar,

    /// Total permits (the concurrency budget)
    capacity: usize,
}

impl PermitPool {
    pub fn new(capacity: NonZeroUsize) -> Arc<Self> {
        Arc::new(Self {
            available: Mutex::new(capacity.get()),
            released: Condvar::new(),
            capacity: capacity.get(),
        })
    }

    /// Take one permit, blocking with no deadline until one is free
    pub fn acquire(self: &Arc<Self>) -> Permit {
        let mut available = self.available.lock();
        while *available == 0 {
            trace!("All {} permits held, waiting", self.capacity);
            self.released.wait(&mut available);
        }
        *available -= 1;

        Permit {
            pool: Arc::clone(self),
        }
    }

    /// Take a permit only if one is free right now
    pub fn try_acquire(self: &Arc<Self>) -> Option<Permit> {
        let mut available = self.available.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;

        Some(Permit {
            pool: Arc::clone(self),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    pub fn in_use(&self) -> usize {
        self.capacity - self.available()
    }

    fn release(&self) {
        let mut available = self.available.lock();
        *available += 1;
        debug_assert!(*available <= self.capacity);
        self.released.notify_one();
    }
}

/// A held permit; returned to its pool on drop, including during unwinding
#[derive(Debug)]
pub struct Permit {
    pool: Arc<PermitPool>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.pool.release();
    }
}
