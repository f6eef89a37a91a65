use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::SchedulerError;

/// The deferred work carried by a [`Task`].
///
/// Returning `Err` reports a failure to the scheduler, which logs it and moves on.
pub type TaskAction = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// A unit of deferred work paired with the earliest instant it may run.
///
/// Tasks have no identity of their own. Two tasks scheduled for the same
/// instant are interchangeable as far as the scheduler is concerned; the
/// optional label only shows up in log output.
pub struct Task {
    action: TaskAction,
    scheduled_at: DateTime<Utc>,
    label: Option<String>,
}

impl Task {
    /// Create a task that becomes eligible at `scheduled_at`.
    pub fn new<F>(action: F, scheduled_at: DateTime<Utc>) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            action: Box::new(action),
            scheduled_at,
            label: None,
        }
    }

    /// Create a task that becomes eligible once `delay` has elapsed from now.
    pub fn after<F>(action: F, delay: Duration) -> Result<Self, SchedulerError>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let scheduled_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or(SchedulerError::DelayOutOfRange(delay))?;
        Ok(Self::new(action, scheduled_at))
    }

    /// Attach a diagnostic label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether the task's scheduled instant has arrived at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at <= now
    }

    pub(crate) fn into_action(self) -> TaskAction {
        self.action
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("scheduled_at", &self.scheduled_at)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
