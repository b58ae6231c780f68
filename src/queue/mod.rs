//! The task carrier: a bounded MPMC ring buffer.
//!
//! The ring is the only synchronization point on the submit/execute hot path.
//! Producers and consumers coordinate through per-slot sequence counters
//! rather than a shared lock, so an uncontended enqueue or dequeue completes
//! with one CAS and one release store.

mod ring;

pub use ring::RingBuffer;
