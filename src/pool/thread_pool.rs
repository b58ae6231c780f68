//! Thread pool implementation

use crate::core::task::panic_message;
use crate::core::{task_channel, PoolError, Result, TaskEnvelope, TaskError, TaskFuture};
use crate::pool::worker::{Worker, WorkerStats};
use crate::queue::RingBuffer;
use crate::wait::{WaitStrategy, WaitStrategyKind};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// Configuration for a thread pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads (0 = number of CPUs)
    pub num_workers: usize,
    /// Wait strategy the workers idle on
    pub wait_strategy: WaitStrategyKind,
    /// Thread name prefix; also used as the pool name in errors
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            wait_strategy: WaitStrategyKind::default(),
            thread_name_prefix: "worker".to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with the specified number of workers
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: if num_workers == 0 {
                num_cpus::get()
            } else {
                num_workers
            },
            ..Default::default()
        }
    }

    /// Select the wait strategy
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_wait_strategy(mut self, kind: WaitStrategyKind) -> Self {
        self.wait_strategy = kind;
        self
    }

    /// Set the thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(PoolError::invalid_config(
                "num_workers",
                "number of workers must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Lifecycle states of a pool.
///
/// Transitions are strictly monotonic: Initializing → Running → Stopping →
/// Stopped, with no way back once Stopping has been observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    /// Workers are being spawned; submission is not yet accepted
    Initializing = 0,
    /// Accepting submissions and executing tasks
    Running = 1,
    /// Draining: queued and in-flight tasks finish, new submissions fail
    Stopping = 2,
    /// All workers have exited
    Stopped = 3,
}

impl PoolState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => PoolState::Initializing,
            1 => PoolState::Running,
            2 => PoolState::Stopping,
            3 => PoolState::Stopped,
            _ => unreachable!("invalid pool state"),
        }
    }
}

/// The pool's lifecycle word; shared between the pool handle and its workers
pub(crate) struct AtomicPoolState(AtomicU8);

impl AtomicPoolState {
    pub(crate) fn new(state: PoolState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self, order: Ordering) -> PoolState {
        PoolState::from_raw(self.0.load(order))
    }

    pub(crate) fn store(&self, state: PoolState, order: Ordering) {
        self.0.store(state as u8, order);
    }

    /// One-way transition attempt; fails if another thread got there first
    pub(crate) fn transition(&self, from: PoolState, to: PoolState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for AtomicPoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.load(Ordering::Acquire))
    }
}

/// A fixed-size pool of worker threads fed by a shared MPMC ring.
///
/// `M` is the metadata type attached to every envelope; it defaults to `()`.
/// The pool shares ownership of the ring with its workers, spawns all
/// threads at construction, and never resizes. Dropping the pool shuts it
/// down, draining every task that was enqueued before the shutdown began.
///
/// # Example
///
/// ```rust
/// use ring_thread_pool::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<()> {
/// let ring = Arc::new(RingBuffer::with_capacity(128)?);
/// let pool: ThreadPool = ThreadPool::with_workers(Arc::clone(&ring), 4)?;
///
/// let future = pool.submit(|| 6 * 7)?;
/// assert_eq!(future.wait().unwrap(), 42);
///
/// pool.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct ThreadPool<M: Send + 'static = ()> {
    config: PoolConfig,
    ring: Arc<RingBuffer<TaskEnvelope<M>>>,
    strategy: Arc<dyn WaitStrategy>,
    workers: Mutex<Vec<Worker>>,
    worker_stats: Vec<Arc<WorkerStats>>,
    state: Arc<AtomicPoolState>,
    active_tasks: Arc<AtomicUsize>,
    total_submitted: AtomicU64,
}

impl<M: Send + 'static> ThreadPool<M> {
    /// Create a pool over `ring` with the given configuration.
    ///
    /// Workers are spawned immediately; the pool is Running when this
    /// returns. If any worker fails to spawn, the ones already started are
    /// shut down before the error is returned.
    pub fn new(ring: Arc<RingBuffer<TaskEnvelope<M>>>, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let state = Arc::new(AtomicPoolState::new(PoolState::Initializing));
        let active_tasks = Arc::new(AtomicUsize::new(0));
        let strategy = config.wait_strategy.create();

        let mut workers = Vec::with_capacity(config.num_workers);
        for id in 0..config.num_workers {
            let spawned = Worker::spawn(
                id,
                &config.thread_name_prefix,
                Arc::clone(&ring),
                Arc::clone(&strategy),
                Arc::clone(&state),
                Arc::clone(&active_tasks),
            );
            match spawned {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    state.store(PoolState::Stopping, Ordering::Release);
                    strategy.notify_all();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    state.store(PoolState::Stopped, Ordering::Release);
                    return Err(e);
                }
            }
        }

        let worker_stats = workers.iter().map(Worker::stats).collect();
        state.store(PoolState::Running, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::info!(
            workers = config.num_workers,
            ring_capacity = ring.capacity(),
            strategy = ?config.wait_strategy,
            "thread pool started"
        );

        Ok(Self {
            config,
            ring,
            strategy,
            workers: Mutex::new(workers),
            worker_stats,
            state,
            active_tasks,
            total_submitted: AtomicU64::new(0),
        })
    }

    /// Create a pool with `num_workers` threads and default settings
    pub fn with_workers(ring: Arc<RingBuffer<TaskEnvelope<M>>>, num_workers: usize) -> Result<Self> {
        Self::new(ring, PoolConfig::new(num_workers))
    }

    /// Submit a task with default metadata.
    ///
    /// The returned future resolves with the closure's value, or with
    /// [`TaskError::Panicked`] if the closure panics.
    ///
    /// # Errors
    ///
    /// [`PoolError::QueueFull`] when the ring has no free slot,
    /// [`PoolError::NotRunning`] when the pool has begun shutting down. Both
    /// leave the pool fully usable.
    pub fn submit<F, R>(&self, func: F) -> Result<TaskFuture<R>>
    where
        M: Default,
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.submit_with(M::default(), func)
    }

    /// Submit a task carrying explicit metadata
    pub fn submit_with<F, R>(&self, metadata: M, func: F) -> Result<TaskFuture<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        // Best-effort gate: a shutdown racing this check may still accept
        // the task, in which case the drain executes it.
        if self.state.load(Ordering::Relaxed) != PoolState::Running {
            return Err(PoolError::not_running(&self.config.thread_name_prefix));
        }

        let (promise, future) = task_channel();
        let action = move || match catch_unwind(AssertUnwindSafe(func)) {
            Ok(value) => promise.resolve(value),
            Err(payload) => promise.reject(TaskError::panicked(panic_message(payload.as_ref()))),
        };

        if self.ring.enqueue(TaskEnvelope::new(metadata, action)).is_err() {
            return Err(PoolError::queue_full(self.ring.capacity()));
        }

        self.total_submitted.fetch_add(1, Ordering::Relaxed);
        self.strategy.notify();
        Ok(future)
    }

    /// Submit a task binding `args` into the callable before enqueue.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use ring_thread_pool::prelude::*;
    /// # use std::sync::Arc;
    /// # fn main() -> Result<()> {
    /// # let ring = Arc::new(RingBuffer::with_capacity(8)?);
    /// # let pool: ThreadPool = ThreadPool::with_workers(ring, 1)?;
    /// let future = pool.submit_bound((), |(a, b)| a + b, (7, 5))?;
    /// assert_eq!(future.wait().unwrap(), 12);
    /// # pool.shutdown()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn submit_bound<A, F, R>(&self, metadata: M, func: F, args: A) -> Result<TaskFuture<R>>
    where
        A: Send + 'static,
        F: FnOnce(A) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.submit_with(metadata, move || func(args))
    }

    /// Number of worker threads
    pub fn num_workers(&self) -> usize {
        self.config.num_workers
    }

    /// Current lifecycle state
    pub fn state(&self) -> PoolState {
        self.state.load(Ordering::Acquire)
    }

    /// Whether the pool currently accepts submissions
    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// Number of tasks currently executing on workers
    pub fn active_tasks(&self) -> usize {
        self.active_tasks.load(Ordering::Relaxed)
    }

    /// Total tasks accepted by `submit` since construction
    pub fn total_tasks_submitted(&self) -> u64 {
        self.total_submitted.load(Ordering::Relaxed)
    }

    /// Per-worker statistics; remain readable after shutdown
    pub fn get_stats(&self) -> &[Arc<WorkerStats>] {
        &self.worker_stats
    }

    /// Total tasks executed across all workers
    pub fn total_tasks_processed(&self) -> u64 {
        self.worker_stats
            .iter()
            .map(|s| s.get_tasks_processed())
            .sum()
    }

    /// Total tasks that panicked out of their envelope across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        self.worker_stats
            .iter()
            .map(|s| s.get_tasks_panicked())
            .sum()
    }

    /// Shut the pool down and wait for the drain to finish.
    ///
    /// Idempotent: the losing caller of a concurrent shutdown (and any later
    /// call) returns immediately. Tasks enqueued before the Stopping
    /// transition all run to completion before this returns.
    pub fn shutdown(&self) -> Result<()> {
        if !self
            .state
            .transition(PoolState::Running, PoolState::Stopping)
        {
            return Ok(());
        }

        self.strategy.notify_all();

        let workers = std::mem::take(&mut *self.workers.lock());
        let mut first_error = None;
        for worker in workers {
            if let Err(e) = worker.join() {
                first_error.get_or_insert(e);
            }
        }

        self.state.store(PoolState::Stopped, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::info!(
            tasks_processed = self.total_tasks_processed(),
            tasks_panicked = self.total_tasks_panicked(),
            "thread pool shutdown complete"
        );

        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

impl<M: Send + 'static> fmt::Debug for ThreadPool<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("active_tasks", &self.active_tasks())
            .finish_non_exhaustive()
    }
}

impl<M: Send + 'static> Drop for ThreadPool<M> {
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == PoolState::Running {
            if let Err(e) = self.shutdown() {
                eprintln!(
                    "failed to shut down thread pool '{}' during drop: {}",
                    self.config.thread_name_prefix, e
                );
            }
        }
    }
}
