use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::MutexGuard;
use tracing::{debug, error, info, warn};

use crate::error::TaskError;
use crate::task::Task;

use super::core::Shared;

/// Body of the consumer thread.
///
/// Each pass re-evaluates state from scratch: idle-wait while the queue is
/// empty or input is paused, scheduled-wait while the earliest task lies in
/// the future, otherwise run it with the lock released.
pub(super) fn run_consumer(shared: &Shared, generation: u64) {
    let me = thread::current().id();
    let mut state = shared.state.lock();
    state.consumer = Some(me);
    info!(pending = state.queue.len(), "consumer loop running");

    loop {
        if !state.running || state.generation != generation {
            break;
        }

        if state.input_paused {
            shared.wake.wait(&mut state);
            continue;
        }

        let Some(next_at) = state.queue.next_deadline() else {
            shared.wake.wait(&mut state);
            continue;
        };

        let now = Utc::now();
        if next_at > now {
            let wait = shared.config.scheduled_wait(next_at - now);
            debug!(%next_at, ?wait, "waiting for next task");
            shared.wake.wait_for(&mut state, wait);
            continue;
        }

        let task = match state.queue.extract_min() {
            Ok(task) => task,
            Err(e) => {
                error!(error = %e, "queue empty after peek");
                continue;
            }
        };
        let lateness = (now - task.scheduled_at()).to_std().unwrap_or(Duration::ZERO);

        let (elapsed, outcome) = MutexGuard::unlocked(&mut state, || execute(task));

        state.completed += 1;
        state.stats.record_execution(elapsed, lateness, outcome.is_err());
        if state.all_completed() {
            shared.wake.notify_all();
        }
    }

    if state.consumer == Some(me) {
        state.consumer = None;
    }
    shared.wake.notify_all();
    debug!(pending = state.queue.len(), "consumer loop exited");
}

/// Run one task's action, containing any failure it reports or panic it raises.
fn execute(task: Task) -> (Duration, Result<(), TaskError>) {
    let scheduled_at = task.scheduled_at();
    let label = task.label().unwrap_or("unnamed").to_string();
    let action = task.into_action();

    let started = Instant::now();
    let outcome = match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(TaskError::Failed(format!("{e:#}"))),
        Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
    };
    let elapsed = started.elapsed();

    match &outcome {
        Ok(()) => debug!(task = %label, %scheduled_at, ?elapsed, "task executed"),
        Err(e) => warn!(task = %label, %scheduled_at, error = %e, "task failed"),
    }
    (elapsed, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
