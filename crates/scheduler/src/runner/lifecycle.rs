use std::sync::Arc;
use std::thread;

use tracing::{error, info, warn};

use crate::error::SchedulerError;

use super::execution::run_consumer;
use super::Scheduler;

impl Scheduler {
    /// Spawn the consumer thread. No-op if already running.
    ///
    /// Tasks left queued by an earlier [`stop`](Self::stop) are picked up again.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut worker = self.worker.lock();

        let generation = {
            let mut state = self.shared.state.lock();
            if state.running {
                return Ok(());
            }
            state.running = true;
            state.generation += 1;
            state.generation
        };

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(self.shared.config.worker_thread_name.clone())
            .spawn(move || run_consumer(&shared, generation));

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.state.lock().running = false;
                error!(error = %e, "failed to spawn consumer thread");
                return Err(SchedulerError::Spawn(e));
            }
        };

        // A consumer left over from a stop() issued inside a task exits on its
        // own at the generation check; dropping the handle detaches it.
        let _previous = worker.replace(handle);

        info!(
            thread = %self.shared.config.worker_thread_name,
            pending = self.pending(),
            "Scheduler started"
        );
        Ok(())
    }

    /// Halt consumption and wait for the consumer thread to exit.
    ///
    /// A task already executing runs to completion; queued tasks stay queued.
    /// Concurrent callers all block until the consumer is gone, not just the
    /// one that joins it. Called from inside a task action, this only clears
    /// the running flag, since the consumer cannot join itself.
    pub fn stop(&self) {
        let (on_consumer, generation) = {
            let mut state = self.shared.state.lock();
            state.running = false;
            (
                state.consumer == Some(thread::current().id()),
                state.generation,
            )
        };
        self.shared.wake.notify_all();

        if on_consumer {
            warn!("stop requested from inside a task; consumer exits after it returns");
            return;
        }

        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => {
                if handle.join().is_err() {
                    error!("consumer thread panicked");
                }
                info!(pending = self.pending(), "Scheduler stopped");
            }
            None => {
                // Another caller owns the join; wait for the consumer of this
                // generation to clear itself, unless a newer start took over.
                let mut state = self.shared.state.lock();
                self.shared.wake.wait_while(&mut state, |s| {
                    s.consumer.is_some() && s.generation == generation && !s.running
                });
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
