use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of the scheduler's counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Tasks accepted by `submit`.
    pub submitted: u64,
    /// Tasks whose action has returned (successfully or not).
    pub completed: u64,
    /// Completed tasks whose action failed or panicked.
    pub failed: u64,
    /// Tasks still queued.
    pub pending: usize,
    pub running: bool,
    pub input_paused: bool,
    /// When the most recent task finished.
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Mean action duration over all executed tasks.
    pub avg_task_duration: Duration,
    /// Largest observed gap between a task's scheduled time and its start.
    pub max_lateness: Duration,
}

/// Execution statistics accumulated by the consumer loop.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExecutionStats {
    pub(crate) executed: u64,
    pub(crate) failed: u64,
    pub(crate) last_completed_at: Option<DateTime<Utc>>,
    pub(crate) avg_task_duration: Duration,
    pub(crate) max_lateness: Duration,
}

impl ExecutionStats {
    /// Record one task execution.
    pub(crate) fn record_execution(&mut self, duration: Duration, lateness: Duration, failed: bool) {
        self.executed += 1;
        if failed {
            self.failed += 1;
        }
        self.last_completed_at = Some(Utc::now());
        self.max_lateness = self.max_lateness.max(lateness);

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        self.avg_task_duration = if self.executed == 1 {
            duration
        } else {
            let prev_nanos = self.avg_task_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / self.executed as f64;
            Duration::from_nanos(avg_nanos.max(0.0) as u64)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_single_execution() {
        let mut s = ExecutionStats::default();
        s.record_execution(Duration::from_millis(100), Duration::from_millis(3), false);

        assert_eq!(s.executed, 1);
        assert_eq!(s.failed, 0);
        assert!(s.last_completed_at.is_some());
        assert_eq!(s.avg_task_duration, Duration::from_millis(100));
        assert_eq!(s.max_lateness, Duration::from_millis(3));
    }

    #[test]
    fn record_multiple_executions_averages() {
        let mut s = ExecutionStats::default();
        s.record_execution(Duration::from_millis(100), Duration::from_millis(7), false);
        s.record_execution(Duration::from_millis(200), Duration::from_millis(2), true);

        assert_eq!(s.executed, 2);
        assert_eq!(s.failed, 1);
        // Average of 100ms and 200ms = 150ms
        let avg = s.avg_task_duration.as_millis();
        assert!((140..=160).contains(&avg), "expected ~150ms, got {}ms", avg);
        assert_eq!(s.max_lateness, Duration::from_millis(7));
    }

    #[test]
    fn default_metrics() {
        let m = SchedulerMetrics::default();
        assert_eq!(m.submitted, 0);
        assert_eq!(m.completed, 0);
        assert!(!m.running);
        assert!(m.last_completed_at.is_none());
    }
}
