//! # Ring Thread Pool
//!
//! A fixed-size worker pool fed by a lock-free MPMC ring buffer, for
//! workloads where dispatch overhead dominates task cost.
//!
//! ## Features
//!
//! - **MPMC Ring**: bounded, lock-free task carrier using the slot-sequence
//!   protocol; wait-free on the uncontended path
//! - **Wait Strategies**: four interchangeable policies for idling workers,
//!   from pure spinning to futex-style parking
//! - **Result Futures**: every submission returns a one-shot future carrying
//!   the task's value or its captured panic
//! - **Task Metadata**: attach an arbitrary value to each task for consumers
//!   that read the ring directly
//! - **Draining Shutdown**: every task accepted before shutdown runs to
//!   completion before the workers exit
//!
//! ## Quick Start
//!
//! ```rust
//! use ring_thread_pool::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! // The ring is created first and shared with the pool.
//! let ring = Arc::new(RingBuffer::with_capacity(128)?);
//! let pool: ThreadPool = ThreadPool::with_workers(Arc::clone(&ring), 4)?;
//!
//! // Submissions return futures.
//! let future = pool.submit(|| 6 * 7)?;
//! assert_eq!(future.wait().unwrap(), 42);
//!
//! // Arguments can be bound into the callable at submission time.
//! let sum = pool.submit_bound((), |(a, b)| a + b, (7, 5))?;
//! assert_eq!(sum.wait().unwrap(), 12);
//!
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing a Wait Strategy
//!
//! ```rust
//! use ring_thread_pool::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let ring = Arc::new(RingBuffer::with_capacity(64)?);
//! let config = PoolConfig::new(2).with_wait_strategy(WaitStrategyKind::SpinBackoff);
//! let pool: ThreadPool = ThreadPool::new(ring, config)?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Task Failures
//!
//! A panicking task resolves its own future with the captured payload and
//! leaves the worker untouched:
//!
//! ```rust
//! use ring_thread_pool::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! # let ring = Arc::new(RingBuffer::with_capacity(8)?);
//! # let pool: ThreadPool = ThreadPool::with_workers(ring, 1)?;
//! let future = pool.submit(|| -> u32 { panic!("out of cheese") })?;
//! assert!(matches!(future.wait(), Err(TaskError::Panicked { .. })));
//!
//! // The pool keeps working.
//! assert_eq!(pool.submit(|| 1)?.wait().unwrap(), 1);
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod wait;

pub use crate::core::{PoolError, Result, TaskEnvelope, TaskError, TaskFuture, TaskResult};
pub use pool::{PoolConfig, PoolState, ThreadPool, WorkerStats};
pub use queue::RingBuffer;
pub use wait::{WaitStrategy, WaitStrategyKind};
