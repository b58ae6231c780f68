//! Flag-based wait strategy using address-keyed parking

use super::WaitStrategy;
use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};
use std::sync::atomic::{AtomicBool, Ordering};

/// Parks waiters on an atomic boolean, futex-style.
///
/// `wait` blocks until the flag is observed `true`; `notify` sets it and
/// wakes one parked thread, `notify_all` wakes all of them. The flag stays
/// set until a worker's `reset` clears it after a successful dequeue, so a
/// notification that lands while no one is parked is not lost.
///
/// This is the preferred default: waiters consume no CPU and the producer
/// side is one store plus one wake.
#[derive(Debug, Default)]
pub struct AtomicFlagStrategy {
    notified: AtomicBool,
}

impl AtomicFlagStrategy {
    /// Create a strategy with the flag initially clear
    pub fn new() -> Self {
        Self {
            notified: AtomicBool::new(false),
        }
    }

    // Parked threads are keyed by the flag's address, which is stable for
    // the lifetime of the strategy (workers hold it behind an Arc).
    fn park_key(&self) -> usize {
        &self.notified as *const AtomicBool as usize
    }
}

impl WaitStrategy for AtomicFlagStrategy {
    fn wait(&self) {
        if self.notified.load(Ordering::Acquire) {
            return;
        }
        // The validate closure runs under the parking-lot bucket lock, so a
        // notify that lands between the load above and the park below aborts
        // the park instead of being missed.
        unsafe {
            parking_lot_core::park(
                self.park_key(),
                || !self.notified.load(Ordering::Acquire),
                || {},
                |_, _| {},
                DEFAULT_PARK_TOKEN,
                None,
            );
        }
    }

    fn notify(&self) {
        self.notified.store(true, Ordering::Release);
        unsafe {
            parking_lot_core::unpark_one(self.park_key(), |_| DEFAULT_UNPARK_TOKEN);
        }
    }

    fn notify_all(&self) {
        self.notified.store(true, Ordering::Release);
        unsafe {
            parking_lot_core::unpark_all(self.park_key(), DEFAULT_UNPARK_TOKEN);
        }
    }

    fn reset(&self) {
        self.notified.store(false, Ordering::Relaxed);
    }
}
