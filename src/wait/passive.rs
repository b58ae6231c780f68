//! Sleep-based wait strategy

use super::WaitStrategy;
use std::thread;
use std::time::Duration;

/// Sleeps a fixed interval between ring checks.
///
/// Lowest CPU cost of the four strategies and the highest wake-up latency:
/// a task submitted right after a worker dozes off waits out the remainder of
/// the interval. Notifications are no-ops.
#[derive(Clone, Copy, Debug)]
pub struct PassiveStrategy {
    interval: Duration,
}

impl PassiveStrategy {
    /// Interval used by [`PassiveStrategy::new`]
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

    /// Create a strategy sleeping [`DEFAULT_INTERVAL`](Self::DEFAULT_INTERVAL)
    pub fn new() -> Self {
        Self::with_interval(Self::DEFAULT_INTERVAL)
    }

    /// Create a strategy sleeping `interval` per wait
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for PassiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for PassiveStrategy {
    fn wait(&self) {
        thread::sleep(self.interval);
    }

    fn notify(&self) {}

    fn notify_all(&self) {}

    fn reset(&self) {}
}
