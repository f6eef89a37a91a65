//! Timed task scheduler.
//!
//! Callers submit deferred work with an absolute execution time. A single
//! consumer thread drains a [`TimeHeap`] in time order and runs each task no
//! earlier than its scheduled instant. See [`Scheduler`] for the lifecycle.

pub mod config;
pub mod error;
pub mod heap;
pub mod metrics;
pub mod runner;
pub mod task;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, TaskError};
pub use heap::TimeHeap;
pub use metrics::SchedulerMetrics;
pub use runner::Scheduler;
pub use task::{Task, TaskAction};
