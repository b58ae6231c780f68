//! Comparing wait strategies on the same workload
//!
//! Run with: cargo run --release --example wait_strategies

use ring_thread_pool::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

const TASKS: u64 = 10_000;

fn run_workload(kind: WaitStrategyKind) -> Result<std::time::Duration> {
    let ring = Arc::new(RingBuffer::with_capacity(1024)?);
    let config = PoolConfig::new(4).with_wait_strategy(kind);
    let pool: ThreadPool = ThreadPool::new(ring, config)?;

    let counter = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    for _ in 0..TASKS {
        let counter = Arc::clone(&counter);
        let task = move || {
            counter.fetch_add(1, Ordering::Relaxed);
        };
        loop {
            match pool.submit(task.clone()) {
                Ok(_) => break,
                Err(PoolError::QueueFull { .. }) => std::thread::yield_now(),
                Err(e) => return Err(e),
            }
        }
    }

    pool.shutdown()?;
    assert_eq!(counter.load(Ordering::Relaxed), TASKS);
    Ok(start.elapsed())
}

fn main() -> Result<()> {
    println!("{} empty tasks through a 4-worker pool:\n", TASKS);

    for kind in [
        WaitStrategyKind::Passive,
        WaitStrategyKind::SpinBackoff,
        WaitStrategyKind::AtomicFlag,
        WaitStrategyKind::Condvar,
    ] {
        let elapsed = run_workload(kind)?;
        println!("  {:?}: {:?}", kind, elapsed);
    }

    Ok(())
}
