//! Bounded MPMC ring buffer using the slot-sequence protocol.

use crate::core::{PoolError, Result};
use crossbeam::utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One ring cell. The sequence counter encodes ownership: `sequence == pos`
/// means empty and claimable by the producer for round `pos / capacity`;
/// `sequence == pos + 1` means full and claimable by the consumer.
struct Slot<T> {
    sequence: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

/// A fixed-capacity multi-producer/multi-consumer FIFO queue.
///
/// This is the sole handoff point between submitters and workers. Both
/// operations are non-blocking: [`enqueue`](RingBuffer::enqueue) reports a
/// full ring by handing the value back, [`dequeue`](RingBuffer::dequeue)
/// reports an empty ring with `None`. Neither ever parks a thread, though
/// both may retry briefly while cursors race.
///
/// Capacity must be a power of two and at least 2; the mask trick that maps
/// cursor positions onto slots depends on it.
///
/// # Example
///
/// ```rust
/// use ring_thread_pool::queue::RingBuffer;
///
/// let ring = RingBuffer::with_capacity(8).unwrap();
/// ring.enqueue(1).unwrap();
/// ring.enqueue(2).unwrap();
/// assert_eq!(ring.dequeue(), Some(1));
/// assert_eq!(ring.dequeue(), Some(2));
/// assert_eq!(ring.dequeue(), None);
/// ```
pub struct RingBuffer<T> {
    slots: Box<[CachePadded<Slot<T>>]>,
    mask: usize,
    enqueue_pos: CachePadded<AtomicUsize>,
    dequeue_pos: CachePadded<AtomicUsize>,
}

// The ring hands each value from exactly one producer to exactly one
// consumer; the slot-sequence acquire/release handshake orders the value
// write before the matching read.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Create a ring with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidCapacity`] unless `capacity` is a power of
    /// two and at least 2.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 2 || !capacity.is_power_of_two() {
            return Err(PoolError::invalid_capacity(capacity));
        }

        let slots = (0..capacity)
            .map(|i| {
                CachePadded::new(Slot {
                    sequence: AtomicUsize::new(i),
                    value: UnsafeCell::new(MaybeUninit::uninit()),
                })
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            slots,
            mask: capacity - 1,
            enqueue_pos: CachePadded::new(AtomicUsize::new(0)),
            dequeue_pos: CachePadded::new(AtomicUsize::new(0)),
        })
    }

    /// Number of slots in the ring
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Approximate number of occupied slots.
    ///
    /// The two cursors are read independently, so the value may be stale by
    /// the time the caller sees it.
    pub fn len(&self) -> usize {
        let tail = self.enqueue_pos.load(Ordering::Relaxed);
        let head = self.dequeue_pos.load(Ordering::Relaxed);
        tail.wrapping_sub(head).min(self.capacity())
    }

    /// Whether the ring currently appears empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move `value` into the ring.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` when every slot is occupied, so the caller keeps
    /// ownership and may retry.
    pub fn enqueue(&self, value: T) -> std::result::Result<(), T> {
        let mut pos = self.enqueue_pos.load(Ordering::Relaxed);
        loop {
            let slot = &self.slots[pos & self.mask];
            let seq = slot.sequence.load(Ordering::Acquire);
            let diff = (seq as isize).wrapping_sub(pos as isize);

            if diff == 0 {
                // Slot is empty for this round; race the other producers for
                // it. A failed CAS yields the cursor value it observed, so no
                // reload is needed.
                match self.enqueue_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        unsafe { (*slot.value.get()).write(value) };
                        slot.sequence.store(pos.wrapping_add(1), Ordering::Release);
                        return Ok(());
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                // The slot still holds last round's value: full.
                return Err(value);
            } else {
                // Another producer claimed this position; chase the cursor.
                pos = self.enqueue_pos.load(Ordering::Relaxed);
            }
        }
    }

    /// Move the oldest value out of the ring, or `None` when empty.
    pub fn dequeue(&self) -> Option<T> {
        let mut pos = self.dequeue_pos.load(Ordering::Relaxed);
        loop {
            let slot = &self.slots[pos & self.mask];
            let seq = slot.sequence.load(Ordering::Acquire);
            let diff = (seq as isize).wrapping_sub(pos.wrapping_add(1) as isize);

            if diff == 0 {
                match self.dequeue_pos.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let value = unsafe { (*slot.value.get()).assume_init_read() };
                        // Mark the slot empty for the next round.
                        slot.sequence
                            .store(pos.wrapping_add(self.mask).wrapping_add(1), Ordering::Release);
                        return Some(value);
                    }
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                return None;
            } else {
                pos = self.dequeue_pos.load(Ordering::Relaxed);
            }
        }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Values still in flight are dropped here, never leaked.
        while self.dequeue().is_some() {}
    }
}
