//! Drives one batch of delayed tasks through a [`Scheduler`].
//!
//! Submissions happen inside an input-paused window so the consumer sees the
//! whole batch at once, then the caller blocks until every task has run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tempo_scheduler::{Scheduler, Task};
use tracing::info;

/// Callback invoked with the 1-based task number when a task finishes successfully.
pub type Reporter = Arc<dyn Fn(usize) + Send + Sync>;

/// Submit one task per delay (seconds), release them together, and wait for all of them.
///
/// Task numbers listed in `failing` report an error instead of calling `reporter`.
/// Input is resumed even when reading a delay fails, so tasks submitted up to
/// that point still run. Returns the number of tasks submitted.
pub fn run_batch<I>(
    scheduler: &Scheduler,
    delays: I,
    failing: &HashSet<usize>,
    reporter: Reporter,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<u64>>,
{
    scheduler.pause_input();
    let submitted = submit_all(scheduler, delays, failing, &reporter);
    scheduler.resume_input();

    let submitted = submitted?;
    info!(tasks = submitted, "batch submitted, waiting for completion");
    scheduler.wait_for_completion();
    Ok(submitted)
}

fn submit_all<I>(
    scheduler: &Scheduler,
    delays: I,
    failing: &HashSet<usize>,
    reporter: &Reporter,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<u64>>,
{
    let mut submitted = 0;
    for (index, delay) in delays.into_iter().enumerate() {
        let number = index + 1;
        let delay = delay.with_context(|| format!("failed to read delay for task {number}"))?;
        let should_fail = failing.contains(&number);
        let reporter = Arc::clone(reporter);

        let action = move || {
            if should_fail {
                bail!("task {number} was configured to fail");
            }
            reporter(number);
            Ok(())
        };
        let task = Task::after(action, Duration::from_secs(delay))
            .with_context(|| format!("delay of {delay}s for task {number} is out of range"))?
            .with_label(format!("task-{number}"));
        scheduler
            .submit_task(task)
            .with_context(|| format!("failed to submit task {number}"))?;
        submitted += 1;
    }
    Ok(submitted)
}
