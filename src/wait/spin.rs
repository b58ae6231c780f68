//! Spinning wait strategy with staged backoff

use super::WaitStrategy;
use std::cell::Cell;
use std::hint;
use std::thread;

thread_local! {
    // One counter per worker thread; reset() zeroes it after each dequeue.
    static SPIN_COUNT: Cell<u64> = const { Cell::new(0) };
}

/// Spins through three escalating stages while the ring stays empty.
///
/// The first `spin_limit` empty observations retry immediately, the next
/// `pause_limit` issue a CPU pause hint, and beyond that the worker yields
/// its timeslice to the OS. A successful dequeue resets the ladder.
///
/// There is no cross-thread signaling: `notify` and `notify_all` are no-ops,
/// which keeps the producer fast but burns a core per idle worker. Suited to
/// latency-critical pools that are rarely idle.
#[derive(Clone, Copy, Debug)]
pub struct SpinBackoffStrategy {
    spin_limit: u64,
    pause_limit: u64,
}

impl SpinBackoffStrategy {
    /// Default iterations spent in the plain-retry stage
    pub const DEFAULT_SPIN_LIMIT: u64 = 64;
    /// Default iterations spent in the pause-hint stage
    pub const DEFAULT_PAUSE_LIMIT: u64 = 64;

    /// Create a strategy with the default stage limits
    pub fn new() -> Self {
        Self::with_limits(Self::DEFAULT_SPIN_LIMIT, Self::DEFAULT_PAUSE_LIMIT)
    }

    /// Create a strategy with explicit stage limits
    pub fn with_limits(spin_limit: u64, pause_limit: u64) -> Self {
        Self {
            spin_limit,
            pause_limit,
        }
    }
}

impl Default for SpinBackoffStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitStrategy for SpinBackoffStrategy {
    fn wait(&self) {
        SPIN_COUNT.with(|count| {
            let n = count.get();
            if n < self.spin_limit {
                count.set(n + 1);
            } else if n < self.spin_limit + self.pause_limit {
                count.set(n + 1);
                hint::spin_loop();
            } else {
                thread::yield_now();
            }
        });
    }

    fn notify(&self) {}

    fn notify_all(&self) {}

    fn reset(&self) {
        SPIN_COUNT.with(|count| count.set(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_wait_never_blocks() {
        let strategy = SpinBackoffStrategy::with_limits(4, 4);
        let start = Instant::now();
        for _ in 0..1000 {
            strategy.wait();
        }
        // Spinning and yielding, but never sleeping.
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_reset_restarts_the_ladder() {
        let strategy = SpinBackoffStrategy::new();
        for _ in 0..200 {
            strategy.wait();
        }
        strategy.reset();
        // After reset the next waits are plain retries again; nothing to
        // observe externally beyond them completing.
        strategy.wait();
    }
}
