//! Convenient re-exports for common types and traits

pub use crate::core::{
    task_channel, PoolError, Result, TaskAction, TaskEnvelope, TaskError, TaskFuture, TaskPromise,
    TaskResult,
};
pub use crate::pool::{PoolConfig, PoolState, ThreadPool, Worker, WorkerStats};
pub use crate::queue::RingBuffer;
pub use crate::wait::{
    AtomicFlagStrategy, CondvarStrategy, PassiveStrategy, SpinBackoffStrategy, WaitStrategy,
    WaitStrategyKind,
};
