use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use crate::core::config::SessionConfig;
use crate::core::counters::Counters;
use crate::core::error::BoardError;
use crate::core::event::JobEvent;
use crate::core::formatter::format_status_line;
use crate::core::job::{Job, JobId, JobStatus, TickOutcome};
use crate::core::runner::{self, RunnerHandle};

/// One interactive session: its jobs, counters and task runners.
///
/// The session is single-writer. The frontend loop owns it and feeds it the
/// events received from [`Session::new`]'s channel; runners never touch it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    counters: Counters,
    /// Newest first.
    jobs: VecDeque<Job>,
    runners: HashMap<JobId, RunnerHandle>,
    rng: StdRng,
    events_tx: Sender<JobEvent>,
    accepting: bool,
}

impl Session {
    /// Creates a session and the receiving end of its runners' events.
    pub fn new(config: SessionConfig) -> Result<(Self, Receiver<JobEvent>), BoardError> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::channel::<JobEvent>();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let session = Self {
            config,
            counters: Counters::default(),
            jobs: VecDeque::new(),
            runners: HashMap::new(),
            rng,
            events_tx,
            accepting: true,
        };
        Ok((session, events_rx))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn is_idle(&self) -> bool {
        self.counters.running() == 0
    }

    pub fn sample_duration(&mut self) -> u32 {
        self.rng
            .gen_range(self.config.min_ticks..self.config.max_ticks)
    }

    pub fn start_job(&mut self) -> Result<JobId, BoardError> {
        if !self.accepting {
            return Err(BoardError::SessionClosed);
        }
        let ticks = self.sample_duration();
        self.start_job_with_duration(ticks)
    }

    pub fn start_job_with_duration(&mut self, duration_ticks: u32) -> Result<JobId, BoardError> {
        if !self.accepting {
            return Err(BoardError::SessionClosed);
        }
        if duration_ticks == 0 {
            return Err(BoardError::InvalidDuration);
        }

        let id = JobId(self.counters.next_id());
        let mut job = Job::new(id, duration_ticks);
        let handle = runner::spawn(
            job.id,
            job.duration_ticks,
            self.config.tick_interval,
            self.events_tx.clone(),
        )
        .map_err(|err| {
            error!(job_id = %id, %err, "could not start task runner");
            err
        })?;

        job.mark_running();
        self.jobs.push_front(job);
        self.counters.record_started();
        self.runners.insert(id, handle);

        info!(job_id = %id, duration_ticks, "job started");
        Ok(id)
    }

    pub fn handle_event(&mut self, event: JobEvent) -> TickOutcome {
        match event {
            JobEvent::Tick { job_id, .. } => self.on_tick(job_id),
        }
    }

    pub fn on_tick(&mut self, job_id: JobId) -> TickOutcome {
        if !self.accepting {
            debug!(%job_id, "dropping tick after shutdown");
            return TickOutcome::Ignored;
        }
        let Some(job) = self.jobs.iter_mut().find(|job| job.id == job_id) else {
            debug!(%job_id, "dropping tick for unknown job");
            return TickOutcome::Ignored;
        };

        let outcome = job.tick();
        match outcome {
            TickOutcome::Completed => {
                self.counters.record_completed();
                self.runners.remove(&job_id);
                info!(%job_id, status = %self.status_line(), "job completed");
            }
            TickOutcome::Ignored => {
                debug!(%job_id, "dropping tick for completed job");
            }
            TickOutcome::Advanced => {}
        }
        outcome
    }

    /// Aggregate display text, always derived from the counters.
    pub fn status_line(&self) -> String {
        format_status_line(&self.counters)
    }

    /// Removes completed rows. Counters keep their totals.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.status != JobStatus::Completed);
        before - self.jobs.len()
    }

    /// Stops accepting jobs and cancels every in-flight runner.
    pub fn shutdown(&mut self) {
        if !self.accepting {
            return;
        }
        self.accepting = false;
        for handle in self.runners.values() {
            handle.cancel();
        }
        let cancelled = self.runners.len();
        for (_, handle) in self.runners.drain() {
            handle.join();
        }
        info!(cancelled, "session shut down");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
