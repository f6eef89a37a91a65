use std::time::Duration;

use super::Scheduler;

impl Scheduler {
    /// Block until every task submitted so far has run.
    ///
    /// The predicate is re-checked against live counters, so submissions made
    /// while waiting extend the wait. Returns immediately when nothing is pending.
    /// Must not be called from inside a task action, and never returns while the
    /// scheduler is stopped with tasks queued.
    pub fn wait_for_completion(&self) {
        let mut state = self.shared.state.lock();
        self.shared
            .wake
            .wait_while(&mut state, |s| !s.all_completed());
    }

    /// Like [`wait_for_completion`](Self::wait_for_completion), giving up after `timeout`.
    ///
    /// Returns whether all submitted tasks had completed.
    pub fn wait_for_completion_timeout(&self, timeout: Duration) -> bool {
        let mut state = self.shared.state.lock();
        let result = self
            .shared
            .wake
            .wait_while_for(&mut state, |s| !s.all_completed(), timeout);
        !result.timed_out() || state.all_completed()
    }
}
