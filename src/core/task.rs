//! Task envelopes: the values carried by the ring

use std::any::Any;
use std::fmt;

/// The type-erased nullary action stored in an envelope
pub type TaskAction = Box<dyn FnOnce() + Send>;

/// A unit of deferred work: caller-supplied metadata plus a ready-to-invoke
/// action.
///
/// Envelopes are built by [`ThreadPool::submit`](crate::pool::ThreadPool::submit)
/// and moved through the ring by value; the action is invoked exactly once by
/// whichever worker dequeues it. The metadata type defaults to `()` for
/// callers that have nothing to attach.
pub struct TaskEnvelope<M = ()> {
    metadata: M,
    action: TaskAction,
}

impl<M> TaskEnvelope<M> {
    /// Wrap metadata and an action into an envelope
    pub fn new(metadata: M, action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            metadata,
            action: Box::new(action),
        }
    }

    /// Borrow the caller-supplied metadata
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Split the envelope into its metadata and action
    pub fn into_parts(self) -> (M, TaskAction) {
        (self.metadata, self.action)
    }

    /// Consume the envelope and run its action
    pub fn execute(self) {
        (self.action)();
    }
}

impl<M: fmt::Debug> fmt::Debug for TaskEnvelope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEnvelope")
            .field("metadata", &self.metadata)
            .field("action", &"<erased>")
            .finish()
    }
}

/// Render a panic payload as a message string
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_envelope_executes_action() {
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);

        let envelope = TaskEnvelope::new((), move || {
            ran_clone.store(true, Ordering::SeqCst);
        });
        envelope.execute();

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_envelope_metadata() {
        let envelope = TaskEnvelope::new(42u32, || {});
        assert_eq!(*envelope.metadata(), 42);

        let (metadata, action) = envelope.into_parts();
        assert_eq!(metadata, 42);
        action();
    }

    #[test]
    fn test_envelope_moves_between_owners() {
        let envelope = TaskEnvelope::new("tag", || {});
        let moved = envelope;
        assert_eq!(*moved.metadata(), "tag");
        moved.execute();
    }

    #[test]
    fn test_panic_message_downcasts() {
        let result = std::panic::catch_unwind(|| panic!("static message"));
        let payload = result.unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let result = std::panic::catch_unwind(|| panic!("value {}", 7));
        let payload = result.unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "value 7");
    }
}
