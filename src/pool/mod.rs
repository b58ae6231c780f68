//! Thread pool and worker implementations

pub mod thread_pool;
pub mod worker;

pub use thread_pool::{PoolConfig, PoolState, ThreadPool};
pub use worker::{Worker, WorkerStats};
