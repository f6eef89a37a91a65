use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the scheduler and its configuration layer.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid schedule: {scheduled_at} is earlier than {now}")]
    InvalidSchedule {
        scheduled_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("time heap is empty")]
    EmptyQueue,

    #[error("delay {0:?} is out of range")]
    DelayOutOfRange(Duration),

    #[error("failed to spawn consumer thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),
}

/// Failure raised by a task's action.
///
/// Never returned to a caller: the consumer logs it and counts the task as
/// completed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task failed: {0}")]
    Failed(String),

    #[error("task panicked: {0}")]
    Panicked(String),
}
