use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::core::error::BoardError;
use crate::core::event::JobEvent;
use crate::core::job::JobId;

/// Owning side of a running task runner.
///
/// Dropping the handle disconnects the cancel channel, which stops the
/// runner at its next wait.
#[derive(Debug)]
pub struct RunnerHandle {
    cancel_tx: Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunnerHandle {
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(());
    }

    pub fn join(mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns a worker thread that emits `duration_ticks` tick events, one per
/// `interval`.
pub fn spawn(
    job_id: JobId,
    duration_ticks: u32,
    interval: Duration,
    events: Sender<JobEvent>,
) -> Result<RunnerHandle, BoardError> {
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

    let thread = thread::Builder::new()
        .name(format!("job-{job_id}"))
        .spawn(move || {
            for tick in 1..=duration_ticks {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        debug!(%job_id, tick, "task runner cancelled");
                        return;
                    }
                }

                if events.send(JobEvent::Tick { job_id, tick }).is_err() {
                    debug!(%job_id, tick, "session detached, stopping task runner");
                    return;
                }
            }
        })
        .map_err(BoardError::Spawn)?;

    Ok(RunnerHandle {
        cancel_tx,
        thread: Some(thread),
    })
}
