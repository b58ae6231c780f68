//! Wait strategies coordinating producers and idle workers.
//!
//! A worker that observes an empty ring parks itself through the pool's
//! strategy; a producer that enqueues a task nudges it through
//! [`notify`](WaitStrategy::notify). The four implementations trade CPU for
//! wake-up latency:
//!
//! - [`PassiveStrategy`]: sleep a fixed interval; notifications are no-ops.
//! - [`SpinBackoffStrategy`]: spin, then pause, then yield; no signaling.
//! - [`AtomicFlagStrategy`]: futex-style parking on an atomic flag (default).
//! - [`CondvarStrategy`]: mutex plus condition variable; most portable.
//!
//! Notifications may be coalesced or lost. That is tolerated by contract:
//! workers always re-check the ring after returning from
//! [`wait`](WaitStrategy::wait), so a missed wake-up costs latency, never a
//! stuck task.

mod atomic;
mod condvar;
mod passive;
mod spin;

pub use atomic::AtomicFlagStrategy;
pub use condvar::CondvarStrategy;
pub use passive::PassiveStrategy;
pub use spin::SpinBackoffStrategy;

use std::sync::Arc;

/// Coordination capability between producers and idle workers.
///
/// All methods take `&self`; one strategy instance is shared by every worker
/// of a pool.
pub trait WaitStrategy: Send + Sync {
    /// Park, spin, or sleep after observing an empty ring
    fn wait(&self);

    /// Wake at most one waiter after a successful enqueue
    fn notify(&self);

    /// Wake every waiter; used for shutdown
    fn notify_all(&self);

    /// Restore per-waiter state after a successful dequeue
    fn reset(&self);
}

/// Selects which wait strategy a pool is built with.
///
/// # Example
///
/// ```rust
/// use ring_thread_pool::wait::WaitStrategyKind;
///
/// let strategy = WaitStrategyKind::SpinBackoff.create();
/// strategy.notify(); // no-op for spinning strategies
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaitStrategyKind {
    /// Fixed-interval sleep
    Passive,
    /// Spin with backoff, no cross-thread signaling
    SpinBackoff,
    /// Park on an atomic flag
    #[default]
    AtomicFlag,
    /// Condition-variable/mutex pair
    Condvar,
}

impl WaitStrategyKind {
    /// Instantiate the selected strategy with its default parameters
    pub fn create(self) -> Arc<dyn WaitStrategy> {
        match self {
            WaitStrategyKind::Passive => Arc::new(PassiveStrategy::new()),
            WaitStrategyKind::SpinBackoff => Arc::new(SpinBackoffStrategy::new()),
            WaitStrategyKind::AtomicFlag => Arc::new(AtomicFlagStrategy::new()),
            WaitStrategyKind::Condvar => Arc::new(CondvarStrategy::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kind_is_atomic_flag() {
        assert_eq!(WaitStrategyKind::default(), WaitStrategyKind::AtomicFlag);
    }

    #[test]
    fn test_every_kind_builds() {
        for kind in [
            WaitStrategyKind::Passive,
            WaitStrategyKind::SpinBackoff,
            WaitStrategyKind::AtomicFlag,
            WaitStrategyKind::Condvar,
        ] {
            let strategy = kind.create();
            // The notify/reset side must always be callable, waiter or not.
            strategy.notify();
            strategy.notify_all();
            strategy.reset();
        }
    }
}
