use std::sync::Arc;
use std::thread::{JoinHandle, ThreadId};

use parking_lot::{Condvar, Mutex};

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::heap::TimeHeap;
use crate::metrics::{ExecutionStats, SchedulerMetrics};

/// Everything guarded by the scheduler lock.
#[derive(Debug, Default)]
pub(super) struct SchedulerState {
    pub(super) queue: TimeHeap,
    pub(super) submitted: u64,
    pub(super) completed: u64,
    pub(super) input_paused: bool,
    pub(super) running: bool,
    /// Bumped by every `start`; a consumer exits once it no longer matches.
    pub(super) generation: u64,
    /// Thread currently running the consumer loop.
    pub(super) consumer: Option<ThreadId>,
    pub(super) stats: ExecutionStats,
}

impl SchedulerState {
    pub(super) fn all_completed(&self) -> bool {
        self.completed >= self.submitted
    }
}

/// State shared between the scheduler handle and its consumer thread.
///
/// A single condvar carries every wake reason (new work, pause/resume, stop,
/// completion); waiters always re-check state after waking.
pub(super) struct Shared {
    pub(super) state: Mutex<SchedulerState>,
    pub(super) wake: Condvar,
    pub(super) config: SchedulerConfig,
}

/// A timed task scheduler with one dedicated consumer thread.
///
/// Any number of threads may submit, pause, resume, wait or stop concurrently
/// through a shared reference. Dropping the scheduler stops it.
pub struct Scheduler {
    pub(super) shared: Arc<Shared>,
    /// Consumer thread of the current start/stop cycle.
    pub(super) worker: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Create a stopped scheduler with the default config.
    pub fn new() -> Self {
        Self::build(SchedulerConfig::default())
    }

    /// Create a scheduler from a config, starting it if `auto_start` is set.
    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        let auto_start = config.auto_start;
        let scheduler = Self::build(config);
        if auto_start {
            scheduler.start()?;
        }
        Ok(scheduler)
    }

    fn build(config: SchedulerConfig) -> Self {
        let state = SchedulerState {
            input_paused: config.start_paused,
            ..Default::default()
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                wake: Condvar::new(),
                config,
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    /// Whether the consumer loop is active.
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().running
    }

    pub fn is_input_paused(&self) -> bool {
        self.shared.state.lock().input_paused
    }

    /// Number of tasks still queued.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    /// Get a snapshot of the current scheduler metrics.
    pub fn metrics(&self) -> SchedulerMetrics {
        let state = self.shared.state.lock();
        SchedulerMetrics {
            submitted: state.submitted,
            completed: state.completed,
            failed: state.stats.failed,
            pending: state.queue.len(),
            running: state.running,
            input_paused: state.input_paused,
            last_completed_at: state.stats.last_completed_at,
            avg_task_duration: state.stats.avg_task_duration,
            max_lateness: state.stats.max_lateness,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
