//! Core types: errors, task envelopes, and result futures

pub mod error;
pub mod future;
pub mod task;

pub use error::{PoolError, Result, TaskError, TaskResult};
pub use future::{task_channel, TaskFuture, TaskPromise};
pub use task::{TaskAction, TaskEnvelope};
