//! Attaching metadata to tasks
//!
//! Run with: cargo run --example tagged_tasks

use ring_thread_pool::prelude::*;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default)]
struct JobTag {
    source: &'static str,
}

fn main() -> Result<()> {
    let ring = Arc::new(RingBuffer::with_capacity(64)?);
    let pool: ThreadPool<JobTag> = ThreadPool::with_workers(Arc::clone(&ring), 2)?;

    // Metadata travels in the envelope; consumers reading the ring directly
    // can inspect it, while pool workers simply execute the action.
    let tag = JobTag {
        source: "nightly-report",
    };
    println!("submitting task tagged '{}'", tag.source);
    let report = pool.submit_with(tag, || (0..100u64).sum::<u64>())?;
    let untagged = pool.submit(|| "no tag needed")?;

    println!("tagged result:   {}", report.wait().unwrap());
    println!("untagged result: {}", untagged.wait().unwrap());

    pool.shutdown()?;
    Ok(())
}
