//! Worker thread implementation

use crate::core::task::panic_message;
use crate::core::{PoolError, Result, TaskEnvelope};
use crate::pool::thread_pool::{AtomicPoolState, PoolState};
use crate::queue::RingBuffer;
use crate::wait::WaitStrategy;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[cfg(feature = "tracing")]
use tracing::{debug, span, Level};

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Tasks executed to completion (including ones whose closure panicked
    /// into its own future)
    pub tasks_processed: AtomicU64,
    /// Tasks whose action panicked out of the envelope
    pub tasks_panicked: AtomicU64,
    /// Total time spent executing tasks (microseconds)
    pub total_busy_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the processed counter
    pub fn increment_processed(&self) {
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the panicked counter
    pub fn increment_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Add execution time
    pub fn add_busy_time(&self, microseconds: u64) {
        self.total_busy_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get tasks processed
    pub fn get_tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Get tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Average execution time per task in microseconds
    pub fn get_average_busy_time_us(&self) -> f64 {
        let total = self.total_busy_time_us.load(Ordering::Relaxed);
        let count = self.tasks_processed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// A pool-owned thread running the dequeue/execute loop
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a worker thread named `{name_prefix}-{id}`.
    ///
    /// The worker shares the ring, the wait strategy, the lifecycle state,
    /// and the active-task counter with its pool; it exits once the state
    /// reaches Stopping and no task is queued or in flight anywhere in the
    /// pool.
    pub(crate) fn spawn<M: Send + 'static>(
        id: usize,
        name_prefix: &str,
        ring: Arc<RingBuffer<TaskEnvelope<M>>>,
        strategy: Arc<dyn WaitStrategy>,
        state: Arc<AtomicPoolState>,
        active_tasks: Arc<AtomicUsize>,
    ) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || {
                Self::run(id, ring, strategy, state, active_tasks, stats_clone);
            })
            .map_err(|e| PoolError::spawn(id, e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| PoolError::join(self.id, "worker thread panicked"))?;
        }
        Ok(())
    }

    /// Main worker loop.
    ///
    /// Exit requires both an empty ring and a zero active-task count while
    /// the pool is Stopping: tasks enqueued before the transition always run
    /// before the worker leaves.
    fn run<M: Send + 'static>(
        id: usize,
        ring: Arc<RingBuffer<TaskEnvelope<M>>>,
        strategy: Arc<dyn WaitStrategy>,
        state: Arc<AtomicPoolState>,
        active_tasks: Arc<AtomicUsize>,
        stats: Arc<WorkerStats>,
    ) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        #[cfg(feature = "tracing")]
        debug!("worker started");

        loop {
            match ring.dequeue() {
                Some(envelope) => {
                    strategy.reset();
                    active_tasks.fetch_add(1, Ordering::AcqRel);
                    Self::execute_task(id, envelope, &stats);
                    active_tasks.fetch_sub(1, Ordering::AcqRel);
                }
                None => {
                    if state.load(Ordering::Relaxed) == PoolState::Stopping
                        && active_tasks.load(Ordering::Relaxed) == 0
                    {
                        // Pass the shutdown wake along: a sibling parked on a
                        // flag that a late reset() consumed would otherwise
                        // sleep through the drain.
                        strategy.notify_all();
                        #[cfg(feature = "tracing")]
                        debug!(
                            tasks_processed = stats.get_tasks_processed(),
                            "worker shutting down"
                        );
                        break;
                    }
                    strategy.wait();
                }
            }
        }
    }

    /// Execute one envelope with panic isolation
    #[allow(unused_variables)]
    fn execute_task<M>(id: usize, envelope: TaskEnvelope<M>, stats: &WorkerStats) {
        let start = std::time::Instant::now();

        let outcome = catch_unwind(AssertUnwindSafe(|| envelope.execute()));

        let elapsed = start.elapsed();

        match outcome {
            Ok(()) => {
                stats.increment_processed();
                #[cfg(feature = "tracing")]
                debug!(duration_us = elapsed.as_micros() as u64, "task completed");
            }
            Err(payload) => {
                // Submitted tasks capture panics into their future, so this
                // branch fires only for hand-built envelopes.
                let message = panic_message(payload.as_ref());
                #[cfg(feature = "tracing")]
                tracing::error!(panic_message = %message, "task panicked");
                #[cfg(not(feature = "tracing"))]
                eprintln!("worker {}: task panicked: {}", id, message);
                stats.increment_panicked();
            }
        }

        stats.add_busy_time(elapsed.as_micros() as u64);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Normal teardown goes through join(). A worker dropped with its
        // thread still attached only happens on construction-failure paths,
        // after the pool has already flipped to Stopping and notified.
        if let Some(thread) = self.thread.take() {
            if let Err(_panic) = thread.join() {
                eprintln!("worker {}: thread panicked during teardown", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wait::AtomicFlagStrategy;
    use std::time::Duration;

    struct Fixture {
        ring: Arc<RingBuffer<TaskEnvelope<()>>>,
        strategy: Arc<dyn WaitStrategy>,
        state: Arc<AtomicPoolState>,
        active_tasks: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ring: Arc::new(RingBuffer::with_capacity(16).unwrap()),
                strategy: Arc::new(AtomicFlagStrategy::new()),
                state: Arc::new(AtomicPoolState::new(PoolState::Running)),
                active_tasks: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn spawn_worker(&self, id: usize) -> Worker {
            Worker::spawn(
                id,
                "test-worker",
                Arc::clone(&self.ring),
                Arc::clone(&self.strategy),
                Arc::clone(&self.state),
                Arc::clone(&self.active_tasks),
            )
            .expect("failed to spawn worker")
        }

        fn stop(&self) {
            self.state.store(PoolState::Stopping, Ordering::Release);
            self.strategy.notify_all();
        }
    }

    #[test]
    fn test_worker_executes_envelope() {
        let fixture = Fixture::new();
        let worker = fixture.spawn_worker(0);
        let stats = worker.stats();

        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);
        fixture
            .ring
            .enqueue(TaskEnvelope::new((), move || {
                ran_clone.store(true, Ordering::SeqCst);
            }))
            .unwrap_or_else(|_| panic!("ring unexpectedly full"));
        fixture.strategy.notify();

        thread::sleep(Duration::from_millis(100));
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(stats.get_tasks_processed(), 1);

        fixture.stop();
        worker.join().expect("failed to join worker");
    }

    #[test]
    fn test_worker_survives_panicking_envelope() {
        let fixture = Fixture::new();
        let worker = fixture.spawn_worker(0);
        let stats = worker.stats();

        fixture
            .ring
            .enqueue(TaskEnvelope::new((), || panic!("intentional panic")))
            .unwrap_or_else(|_| panic!("ring unexpectedly full"));
        fixture.strategy.notify();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(stats.get_tasks_panicked(), 1);
        assert_eq!(stats.get_tasks_processed(), 0);

        // Worker must still be alive and processing.
        fixture
            .ring
            .enqueue(TaskEnvelope::new((), || {}))
            .unwrap_or_else(|_| panic!("ring unexpectedly full"));
        fixture.strategy.notify();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(stats.get_tasks_processed(), 1);

        fixture.stop();
        worker.join().expect("failed to join worker");
    }

    #[test]
    fn test_worker_drains_before_exit() {
        let fixture = Fixture::new();
        let counter = Arc::new(AtomicUsize::new(0));

        // Queue a batch before the worker even starts, then stop
        // immediately: everything already enqueued must still run.
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            fixture
                .ring
                .enqueue(TaskEnvelope::new((), move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                }))
                .unwrap_or_else(|_| panic!("ring unexpectedly full"));
        }

        let worker = fixture.spawn_worker(0);
        fixture.stop();
        worker.join().expect("failed to join worker");

        assert_eq!(counter.load(Ordering::Relaxed), 10);
    }
}
