//! One-shot result futures connecting a submitted task to its submitter

use crate::core::error::{TaskError, TaskResult};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Create a connected promise/future pair.
///
/// The promise travels inside the task's action; the future is handed back to
/// the submitter. Exactly one resolution (value or failure) flows between
/// them.
pub fn task_channel<T>() -> (TaskPromise<T>, TaskFuture<T>) {
    let (sender, receiver) = bounded(1);
    (TaskPromise { sender }, TaskFuture { receiver })
}

/// The producing end of a task's result channel.
///
/// Consumed by resolution, so a result can be written at most once. Dropping
/// an unresolved promise makes the paired future report
/// [`TaskError::Abandoned`].
pub struct TaskPromise<T> {
    sender: Sender<TaskResult<T>>,
}

impl<T> TaskPromise<T> {
    /// Resolve the future with a value
    pub fn resolve(self, value: T) {
        // The receiver may already be gone; the result is simply discarded.
        let _ = self.sender.send(Ok(value));
    }

    /// Resolve the future with a failure
    pub fn reject(self, error: TaskError) {
        let _ = self.sender.send(Err(error));
    }
}

/// The receiving end of a task's result channel.
///
/// Obtained from the `submit` family on
/// [`ThreadPool`](crate::pool::ThreadPool). The result is observed at most
/// once; [`wait`](TaskFuture::wait) consumes the future.
pub struct TaskFuture<T> {
    receiver: Receiver<TaskResult<T>>,
}

impl<T> TaskFuture<T> {
    /// Block until the task resolves and return its result.
    ///
    /// Returns [`TaskError::Abandoned`] if the task was destroyed without
    /// running, which can only happen when the pool is dropped while the task
    /// is still queued.
    pub fn wait(self) -> TaskResult<T> {
        self.receiver.recv().unwrap_or(Err(TaskError::Abandoned))
    }

    /// Return the result if the task has already resolved, without blocking
    pub fn try_wait(&self) -> Option<TaskResult<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Abandoned)),
        }
    }

    /// Block for at most `timeout` waiting for the result
    pub fn wait_timeout(&self, timeout: Duration) -> Option<TaskResult<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(TaskError::Abandoned)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_resolve_delivers_value() {
        let (promise, future) = task_channel();
        promise.resolve(42);
        assert_eq!(future.wait().unwrap(), 42);
    }

    #[test]
    fn test_reject_delivers_error() {
        let (promise, future) = task_channel::<i32>();
        promise.reject(TaskError::panicked("boom"));
        assert!(matches!(future.wait(), Err(TaskError::Panicked { .. })));
    }

    #[test]
    fn test_dropped_promise_abandons_future() {
        let (promise, future) = task_channel::<i32>();
        drop(promise);
        assert!(matches!(future.wait(), Err(TaskError::Abandoned)));
    }

    #[test]
    fn test_try_wait_before_and_after_resolution() {
        let (promise, future) = task_channel();
        assert!(future.try_wait().is_none());

        promise.resolve("done");
        assert_eq!(future.try_wait().unwrap().unwrap(), "done");
    }

    #[test]
    fn test_wait_timeout_expires() {
        let (_promise, future) = task_channel::<i32>();
        assert!(future.wait_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_wait_blocks_until_cross_thread_resolution() {
        let (promise, future) = task_channel();

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            promise.resolve(7);
        });

        assert_eq!(future.wait().unwrap(), 7);
        producer.join().unwrap();
    }
}
