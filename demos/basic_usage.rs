//! Basic thread pool usage example
//!
//! Demonstrates pool creation, task submission, futures, and statistics.
//!
//! Run with: cargo run --example basic_usage

use ring_thread_pool::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Ring Thread Pool - Basic Usage ===\n");

    let ring = Arc::new(RingBuffer::with_capacity(128)?);
    let pool: ThreadPool = ThreadPool::with_workers(Arc::clone(&ring), 4)?;
    println!("1. Started pool with {} workers", pool.num_workers());

    println!("\n2. Submitting fire-and-forget tasks:");
    for i in 0..10 {
        pool.submit(move || {
            println!(
                "   task {} executing on {:?}",
                i,
                thread::current().name().unwrap_or("?")
            );
            thread::sleep(Duration::from_millis(20));
        })?;
    }

    println!("\n3. Collecting results through futures:");
    let squares: Vec<_> = (0..5)
        .map(|i| pool.submit_bound((), |n: u64| n * n, i))
        .collect::<Result<_>>()?;
    for (i, future) in squares.into_iter().enumerate() {
        println!("   {}^2 = {}", i, future.wait().unwrap());
    }

    pool.shutdown()?;

    println!("\n4. Statistics after shutdown:");
    println!("   submitted: {}", pool.total_tasks_submitted());
    println!("   processed: {}", pool.total_tasks_processed());
    for (i, stats) in pool.get_stats().iter().enumerate() {
        println!(
            "   worker {}: {} tasks, avg {:.1}us",
            i,
            stats.get_tasks_processed(),
            stats.get_average_busy_time_us()
        );
    }

    Ok(())
}
