// src/runtime/dispatcher.rs
//! Batch rendering with bounded concurrency
//!
//! [`RenderEngine`] renders a list of entities and hands every non-empty
//! result to the caller's completion callback. The strategy is fixed once
//! per engine:
//!
//! - **Sequential**: entities render on the calling thread in input order;
//!   the callback is invoked directly with no locking.
//! - **Bounded**: one task per entity is submitted to a [`WorkerPool`]. A
//!   permit is taken before each submission, so at most `budget` tasks are
//!   pending or running. The callback sits behind a [`SerializedSink`].
//!
//! # Architecture
//!
//! ```text
//! entities ──► acquire permit ──► pool.execute(task) ──► ... next entity
//!                                        │
//!                          render ──► deliver (locked) ──► drop permit
//!                                        │
//!                          wait group ◄──┘  (call returns once all tasks finish)
//! ```
//!
//! Delivery order in bounded mode is unspecified; use the position carried
//! with each result to recover a stable order.

use crate::model::{RenderResult, Renderer};
use crate::runtime::permits::{Permit, PermitPool};
use crate::runtime::pool::{Job, ThreadPool, WorkerPool};
use crate::runtime::sink::SerializedSink;
use crate::utils::config::EngineConfig;
use crate::utils::errors::{EngineError, RenderError, Result};
use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// How a batch reacts to a renderer failure or panic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and count the failure; keep rendering the rest
    #[default]
    Skip,

    /// Stop submitting on the first failure, drain in-flight work, return the error
    FailFast,
}

/// Execution strategy, selected once per engine
#[derive(Clone)]
pub enum ExecutionStrategy {
    /// Render on the calling thread, in input order
    Sequential,

    /// Render on `pool` with at most `budget` entities in flight
    Bounded {
        budget: NonZeroUsize,
        pool: Arc<dyn WorkerPool>,
    },
}

impl ExecutionStrategy {
    pub fn bounded(budget: NonZeroUsize, pool: Arc<dyn WorkerPool>) -> Self {
        ExecutionStrategy::Bounded { budget, pool }
    }

    /// Build the strategy described by `config`, spawning a [`ThreadPool`]
    /// when rendering is concurrent
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let Some(budget) = config.concurrency.and_then(NonZeroUsize::new) else {
            return Ok(ExecutionStrategy::Sequential);
        };
        let threads = config.effective_worker_threads().unwrap_or(budget.get());

        let pool = ThreadPool::new(threads)?;
        Ok(ExecutionStrategy::Bounded {
            budget,
            pool: Arc::new(pool),
        })
    }

    /// Concurrency budget, `None` when sequential
    pub fn budget(&self) -> Option<usize> {
        match self {
            ExecutionStrategy::Sequential => None,
            ExecutionStrategy::Bounded { budget, .. } => Some(budget.get()),
        }
    }
}

impl fmt::Debug for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::Bounded { budget, pool } => {
                write!(f, "bounded(budget={}, pool={})", budget, pool.name())
            }
        }
    }
}

/// Per-batch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Entities handed to rendering (pool tasks or sequential iterations)
    pub submitted: usize,

    /// Completion callback invocations
    pub delivered: usize,

    /// Entities that rendered to empty text
    pub empty: usize,

    /// Renderer errors and panics
    pub failed: usize,

    /// Submitted tasks that did not render because the batch was aborted
    pub cancelled: usize,
}

impl RenderStats {
    /// Tasks that reached a final state
    pub fn completed(&self) -> usize {
        self.delivered + self.empty + self.failed + self.cancelled
    }
}

/// Renders entity batches under a fixed strategy and failure policy
#[derive(Debug, Clone)]
pub struct RenderEngine {
    strategy: ExecutionStrategy,
    policy: FailurePolicy,
}

impl RenderEngine {
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self {
            strategy,
            policy: FailurePolicy::default(),
        }
    }

    /// Single-threaded engine
    pub fn sequential() -> Self {
        Self::new(ExecutionStrategy::Sequential)
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(ExecutionStrategy::from_config(config)?).with_policy(config.failure_policy))
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn strategy(&self) -> &ExecutionStrategy {
        &self.strategy
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Render every entity, invoking `completion(text, position)` once per
    /// non-empty result.
    ///
    /// Returns only after every task of this batch has finished; no callback
    /// runs after the call returns. The callback is never invoked
    /// concurrently with itself.
    ///
    /// In bounded mode this blocks the calling thread on permits and on the
    /// final drain, so do not call it from an async worker thread.
    pub fn render<E, R, F>(
        &self,
        entities: Vec<E>,
        renderer: Arc<R>,
        completion: F,
    ) -> Result<RenderStats>
    where
        E: Send + 'static,
        R: Renderer<E>,
        F: FnMut(String, i64) + Send + 'static,
    {
        info!("Rendering {} entities ({})", entities.len(), self.strategy);

        let result = match &self.strategy {
            ExecutionStrategy::Sequential => {
                render_sequential(entities, renderer.as_ref(), self.policy, completion)
            }
            ExecutionStrategy::Bounded { budget, pool } => render_bounded(
                entities,
                renderer,
                *budget,
                pool.as_ref(),
                self.policy,
                completion,
            ),
        };

        match &result {
            Ok(stats) => info!(
                "Rendered batch: {} delivered, {} empty, {} failed",
                stats.delivered, stats.empty, stats.failed
            ),
            Err(e) => match e.entity_index() {
                Some(index) => error!("Batch aborted at entity #{}: {}", index, e),
                None => error!("Batch aborted: {}", e),
            },
        }

        result
    }
}

/// What happened to one entity
enum TaskOutcome {
    Delivered,
    Empty,
    Failed(EngineError),
}

/// Render one entity and deliver it if non-empty.
///
/// Panics from the renderer or the delivery callback are caught here and
/// reported as failures.
fn render_one<E, R, D>(index: usize, entity: &E, renderer: &R, deliver: D) -> TaskOutcome
where
    R: Renderer<E> + ?Sized,
    D: FnOnce(String, i64),
{
    let attempt = panic::catch_unwind(AssertUnwindSafe(
        || -> std::result::Result<bool, RenderError> {
            let RenderResult { text, position } = renderer.render(entity)?;
            if text.is_empty() {
                return Ok(false);
            }
            deliver(text, position);
            Ok(true)
        },
    ));

    match attempt {
        Ok(Ok(true)) => TaskOutcome::Delivered,
        Ok(Ok(false)) => TaskOutcome::Empty,
        Ok(Err(source)) => TaskOutcome::Failed(EngineError::RenderFailed { index, source }),
        Err(payload) => TaskOutcome::Failed(EngineError::TaskPanicked {
            index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Running counters plus the first fatal error of a batch
#[derive(Default)]
struct Tally {
    delivered: usize,
    empty: usize,
    failed: usize,
    cancelled: usize,
    /// Tasks the pool dropped without running
    lost: usize,
    first_error: Option<EngineError>,
}

impl Tally {
    fn record(&mut self, outcome: TaskOutcome, policy: FailurePolicy) {
        match outcome {
            TaskOutcome::Delivered => self.delivered += 1,
            TaskOutcome::Empty => self.empty += 1,
            TaskOutcome::Failed(err) => {
                self.failed += 1;
                match policy {
                    FailurePolicy::Skip => warn!("Skipping entity: {}", err),
                    FailurePolicy::FailFast => {
                        if self.first_error.is_none() {
                            self.first_error = Some(err);
                        }
                    }
                }
            }
        }
    }

    fn aborted(&self) -> bool {
        self.first_error.is_some()
    }

    fn completed(&self) -> usize {
        self.delivered + self.empty + self.failed + self.cancelled
    }

    fn into_result(self, submitted: usize) -> Result<RenderStats> {
        if self.lost > 0 {
            return Err(EngineError::PoolUnavailable(format!(
                "{} of {} submitted tasks were dropped without running",
                self.lost, submitted
            )));
        }

        if let Some(err) = self.first_error {
            return Err(err);
        }

        Ok(RenderStats {
            submitted,
            delivered: self.delivered,
            empty: self.empty,
            failed: self.failed,
            cancelled: self.cancelled,
        })
    }
}

fn render_sequential<E, R, F>(
    entities: Vec<E>,
    renderer: &R,
    policy: FailurePolicy,
    mut completion: F,
) -> Result<RenderStats>
where
    R: Renderer<E> + ?Sized,
    F: FnMut(String, i64),
{
    let mut tally = Tally::default();
    let mut submitted = 0;

    for (index, entity) in entities.iter().enumerate() {
        if tally.aborted() {
            debug!("Stopping after entity #{}", index - 1);
            break;
        }

        submitted += 1;
        let outcome = render_one(index, entity, renderer, |text, position| {
            completion(text, position)
        });
        tally.record(outcome, policy);
    }

    tally.into_result(submitted)
}

fn render_bounded<E, R, F>(
    entities: Vec<E>,
    renderer: Arc<R>,
    budget: NonZeroUsize,
    pool: &dyn WorkerPool,
    policy: FailurePolicy,
    completion: F,
) -> Result<RenderStats>
where
    E: Send + 'static,
    R: Renderer<E>,
    F: FnMut(String, i64) + Send + 'static,
{
    let permits = PermitPool::new(budget);
    let sink = SerializedSink::new(completion);
    let tally = Arc::new(Mutex::new(Tally::default()));
    let in_flight = WaitGroup::new();

    let mut submitted = 0;
    let mut submit_error = None;

    for (index, entity) in entities.into_iter().enumerate() {
        let permit = match permits.try_acquire() {
            Some(permit) => permit,
            None => {
                trace!("Budget of {} saturated, waiting for a permit", budget);
                permits.acquire()
            }
        };

        if tally.lock().aborted() {
            debug!("Batch aborted, not submitting entity #{}", index);
            break;
        }

        let task = RenderTask {
            index,
            entity,
            renderer: Arc::clone(&renderer),
            sink: sink.clone(),
            tally: Arc::clone(&tally),
            policy,
            ran: false,
            _permit: permit,
            _task_done: in_flight.clone(),
        };

        let job: Job = Box::new(move || {
            let mut task = task;
            task.run();
        });

        // A refused job is dropped unrun, releasing its permit and wait slot.
        if let Err(e) = pool.execute(job) {
            error!("Failed to submit entity #{}: {}", index, e);
            submit_error = Some(e);
            break;
        }
        submitted += 1;
    }

    debug!("Submitted {} tasks, waiting for completion", submitted);
    in_flight.wait();
    debug_assert_eq!(permits.in_use(), 0);

    if let Some(err) = submit_error {
        return Err(err);
    }

    let tally = std::mem::take(&mut *tally.lock());
    debug_assert!(
        tally.lost > 0 || tally.first_error.is_some() || tally.completed() == submitted
    );
    tally.into_result(submitted)
}

/// One entity's unit of work, owning everything the task touches.
///
/// Fields drop in declaration order, so the entity and the caller's callback
/// are released before the permit, and the permit before the wait-group
/// token. A task dropped without [`RenderTask::run`] counts as lost.
struct RenderTask<E, R, F> {
    index: usize,
    entity: E,
    renderer: Arc<R>,
    sink: SerializedSink<F>,
    tally: Arc<Mutex<Tally>>,
    policy: FailurePolicy,
    ran: bool,
    _permit: Permit,
    _task_done: WaitGroup,
}

impl<E, R, F> RenderTask<E, R, F>
where
    R: Renderer<E>,
    F: FnMut(String, i64) + Send,
{
    fn run(&mut self) {
        self.ran = true;

        {
            let mut tally = self.tally.lock();
            if tally.aborted() {
                tally.cancelled += 1;
                return;
            }
        }

        trace!("Rendering entity #{}", self.index);
        let sink = &self.sink;
        let outcome = render_one(
            self.index,
            &self.entity,
            self.renderer.as_ref(),
            |text, position| sink.deliver(text, position),
        );
        self.tally.lock().record(outcome, self.policy);
    }
}

impl<E, R, F> Drop for RenderTask<E, R, F> {
    fn drop(&mut self) {
        if !self.ran {
            warn!("Entity #{} was dropped by the pool without rendering", self.index);
            self.tally.lock().lost += 1;
        }
    }
}
