//! Error types for the pool and for task results

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Result type carried by a [`TaskFuture`](crate::core::TaskFuture)
pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Errors reported by ring construction, pool construction, and submission
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// Ring capacity is not a power of two, or is below the minimum
    #[error("ring capacity {requested} is invalid: capacity must be a power of two and at least 2")]
    InvalidCapacity {
        /// The capacity the caller asked for
        requested: usize,
    },

    /// A configuration parameter failed validation
    #[error("invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// The ring rejected the task because every slot is occupied
    #[error("task queue is full ({capacity} slots)")]
    QueueFull {
        /// Capacity of the ring that rejected the task
        capacity: usize,
    },

    /// Submission was attempted while the pool is not in the Running state
    #[error("thread pool '{pool_name}' is not running")]
    NotRunning {
        /// Name of the thread pool
        pool_name: String,
    },

    /// A worker thread could not be spawned
    #[error("failed to spawn worker thread #{worker_id}")]
    Spawn {
        /// Index of the worker that failed to spawn
        worker_id: usize,
        /// Underlying IO error from the OS
        #[source]
        source: std::io::Error,
    },

    /// A worker thread could not be joined
    #[error("failed to join worker thread #{worker_id}: {message}")]
    Join {
        /// Index of the worker that failed to join
        worker_id: usize,
        /// Error message
        message: String,
    },
}

impl PoolError {
    /// Create an invalid capacity error
    pub fn invalid_capacity(requested: usize) -> Self {
        PoolError::InvalidCapacity { requested }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a queue full error
    pub fn queue_full(capacity: usize) -> Self {
        PoolError::QueueFull { capacity }
    }

    /// Create a not running error
    pub fn not_running(pool_name: impl Into<String>) -> Self {
        PoolError::NotRunning {
            pool_name: pool_name.into(),
        }
    }

    /// Create a spawn error from the OS error
    pub fn spawn(worker_id: usize, source: std::io::Error) -> Self {
        PoolError::Spawn { worker_id, source }
    }

    /// Create a join error
    pub fn join(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::Join {
            worker_id,
            message: message.into(),
        }
    }
}

/// Failures delivered through a task's future.
///
/// These never escape into the worker loop; a panicking task poisons only its
/// own future.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TaskError {
    /// The task's closure panicked; the payload is captured as a message
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as a string
        message: String,
    },

    /// The task was destroyed before it produced a result.
    ///
    /// Happens only when the pool is dropped while the task is still queued,
    /// which requires a submission that raced shutdown.
    #[error("task was dropped before producing a result")]
    Abandoned,
}

impl TaskError {
    /// Create a panicked error from a captured panic message
    pub fn panicked(message: impl Into<String>) -> Self {
        TaskError::Panicked {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PoolError::invalid_capacity(3);
        assert!(matches!(err, PoolError::InvalidCapacity { requested: 3 }));

        let err = PoolError::queue_full(128);
        assert!(matches!(err, PoolError::QueueFull { capacity: 128 }));

        let err = PoolError::not_running("main_pool");
        assert!(matches!(err, PoolError::NotRunning { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PoolError::invalid_capacity(12);
        assert_eq!(
            err.to_string(),
            "ring capacity 12 is invalid: capacity must be a power of two and at least 2"
        );

        let err = PoolError::not_running("worker_pool");
        assert_eq!(err.to_string(), "thread pool 'worker_pool' is not running");

        let err = PoolError::queue_full(8);
        assert_eq!(err.to_string(), "task queue is full (8 slots)");
    }

    #[test]
    fn test_spawn_error_carries_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = PoolError::spawn(5, io_err);

        assert!(err.to_string().contains("worker thread #5"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_task_error_display() {
        let err = TaskError::panicked("index out of bounds");
        assert_eq!(err.to_string(), "task panicked: index out of bounds");

        assert_eq!(
            TaskError::Abandoned.to_string(),
            "task was dropped before producing a result"
        );
    }
}
