//! Condition-variable wait strategy

use super::WaitStrategy;
use parking_lot::{Condvar, Mutex};

/// Blocks waiters on a condition variable predicated on a boolean flag.
///
/// The most portable of the four strategies and the most expensive per
/// event: every operation, including the producer-side `notify`, takes the
/// mutex.
#[derive(Debug, Default)]
pub struct CondvarStrategy {
    notified: Mutex<bool>,
    available: Condvar,
}

impl CondvarStrategy {
    /// Create a strategy with the flag initially clear
    pub fn new() -> Self {
        Self {
            notified: Mutex::new(false),
            available: Condvar::new(),
        }
    }
}

impl WaitStrategy for CondvarStrategy {
    fn wait(&self) {
        let mut notified = self.notified.lock();
        while !*notified {
            self.available.wait(&mut notified);
        }
    }

    fn notify(&self) {
        let mut notified = self.notified.lock();
        *notified = true;
        self.available.notify_one();
    }

    fn notify_all(&self) {
        let mut notified = self.notified.lock();
        *notified = true;
        self.available.notify_all();
    }

    fn reset(&self) {
        *self.notified.lock() = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_returns_once_notified() {
        let strategy = Arc::new(CondvarStrategy::new());

        let waiter = {
            let strategy = Arc::clone(&strategy);
            thread::spawn(move || strategy.wait())
        };

        thread::sleep(Duration::from_millis(50));
        strategy.notify();
        waiter.join().unwrap();
    }

    #[test]
    fn test_notify_all_releases_every_waiter() {
        let strategy = Arc::new(CondvarStrategy::new());
        let released = Arc::new(AtomicUsize::new(0));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let strategy = Arc::clone(&strategy);
                let released = Arc::clone(&released);
                thread::spawn(move || {
                    strategy.wait();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        strategy.notify_all();

        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_notified_flag_persists_until_reset() {
        let strategy = CondvarStrategy::new();
        strategy.notify();
        // No waiter was parked; the flag still lets the next wait through.
        strategy.wait();

        strategy.reset();
        // Flag cleared again; notify_all must release a fresh waiter.
        let strategy = Arc::new(strategy);
        let waiter = {
            let strategy = Arc::clone(&strategy);
            thread::spawn(move || strategy.wait())
        };
        thread::sleep(Duration::from_millis(20));
        strategy.notify_all();
        waiter.join().unwrap();
    }
}
