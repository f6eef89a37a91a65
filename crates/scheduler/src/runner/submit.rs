use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::SchedulerError;
use crate::task::Task;

use super::Scheduler;

impl Scheduler {
    /// Submit `action` to run at or after `scheduled_at`.
    ///
    /// Fails with [`SchedulerError::InvalidSchedule`] when `scheduled_at` lies
    /// in an earlier second than now; nothing is queued in that case.
    pub fn submit<F>(&self, action: F, scheduled_at: DateTime<Utc>) -> Result<(), SchedulerError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.submit_task(Task::new(action, scheduled_at))
    }

    /// Submit `action` to run once `delay` has elapsed.
    pub fn submit_after<F>(&self, action: F, delay: Duration) -> Result<(), SchedulerError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.submit_task(Task::after(action, delay)?)
    }

    /// Submit a prebuilt task.
    pub fn submit_task(&self, task: Task) -> Result<(), SchedulerError> {
        let now = Utc::now();
        let scheduled_at = task.scheduled_at();
        // Whole-second resolution: a time within the current second is accepted.
        if scheduled_at.timestamp() < now.timestamp() {
            return Err(SchedulerError::InvalidSchedule { scheduled_at, now });
        }

        let pending = {
            let mut state = self.shared.state.lock();
            state.queue.insert(task);
            state.submitted += 1;
            state.queue.len()
        };
        self.shared.wake.notify_all();

        debug!(%scheduled_at, pending, "task submitted");
        Ok(())
    }

    /// Suspend extraction: queued tasks stay put until [`resume_input`](Self::resume_input).
    pub fn pause_input(&self) {
        self.shared.state.lock().input_paused = true;
        self.shared.wake.notify_all();
        info!("Scheduler input paused");
    }

    /// Release tasks staged while paused.
    pub fn resume_input(&self) {
        let pending = {
            let mut state = self.shared.state.lock();
            state.input_paused = false;
            state.queue.len()
        };
        self.shared.wake.notify_all();
        info!(pending, "Scheduler input resumed");
    }
}
