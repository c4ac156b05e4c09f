use std::fmt;
use std::time::{Duration, Instant};

/// Jobs longer than this many ticks are flagged slow.
pub const SLOW_JOB_TICKS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Completed,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub duration_ticks: u32,
    pub elapsed_ticks: u32,
    pub status: JobStatus,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
}

impl Job {
    pub fn new(id: JobId, duration_ticks: u32) -> Self {
        Self {
            id,
            duration_ticks,
            elapsed_ticks: 0,
            status: JobStatus::Pending,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
            self.started_at = Some(Instant::now());
        }
    }

    /// Advances the job by one tick. Completed jobs absorb further ticks.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status == JobStatus::Completed {
            return TickOutcome::Ignored;
        }

        let next = self.elapsed_ticks.saturating_add(1);
        if next < self.duration_ticks {
            self.elapsed_ticks = next;
            TickOutcome::Advanced
        } else {
            self.elapsed_ticks = self.duration_ticks;
            self.status = JobStatus::Completed;
            self.ended_at = Some(Instant::now());
            TickOutcome::Completed
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_slow(&self) -> bool {
        self.duration_ticks > SLOW_JOB_TICKS
    }

    /// Time from start to completion, or to `now` while still running.
    pub fn wall_time(&self, now: Instant) -> Option<Duration> {
        let started = self.started_at?;
        let end = self.ended_at.unwrap_or(now);
        Some(end.saturating_duration_since(started))
    }

    pub fn ratio(&self) -> f64 {
        if self.duration_ticks == 0 {
            return 1.0;
        }
        (self.elapsed_ticks as f64 / self.duration_ticks as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_pending_and_empty() {
        let job = Job::new(JobId(1), 5);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.elapsed_ticks, 0);
        assert_eq!(job.ratio(), 0.0);
    }

    #[test]
    fn ticks_until_completed() {
        let mut job = Job::new(JobId(1), 3);
        job.mark_running();
        assert_eq!(job.tick(), TickOutcome::Advanced);
        assert_eq!(job.tick(), TickOutcome::Advanced);
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.tick(), TickOutcome::Completed);
        assert_eq!(job.elapsed_ticks, 3);
        assert!(job.is_completed());
        assert!(job.ended_at.is_some());
        assert_eq!(job.ratio(), 1.0);
    }

    #[test]
    fn completed_job_ignores_extra_ticks() {
        let mut job = Job::new(JobId(7), 1);
        job.mark_running();
        assert_eq!(job.tick(), TickOutcome::Completed);
        let ended = job.ended_at;
        assert_eq!(job.tick(), TickOutcome::Ignored);
        assert_eq!(job.tick(), TickOutcome::Ignored);
        assert_eq!(job.elapsed_ticks, 1);
        assert_eq!(job.ended_at, ended);
    }

    #[test]
    fn mark_running_only_leaves_pending() {
        let mut job = Job::new(JobId(1), 1);
        assert_eq!(job.wall_time(Instant::now()), None);
        job.mark_running();
        let started = job.started_at;
        assert!(started.is_some());

        job.tick();
        job.mark_running();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.started_at, started);
    }

    #[test]
    fn wall_time_freezes_at_completion() {
        let mut job = Job::new(JobId(2), 1);
        job.mark_running();
        job.tick();
        let done = job.wall_time(Instant::now()).unwrap();
        let later = Instant::now() + Duration::from_secs(30);
        assert_eq!(job.wall_time(later), Some(done));

        let mut running = Job::new(JobId(3), 5);
        running.mark_running();
        let started = running.started_at.unwrap();
        assert_eq!(
            running.wall_time(started + Duration::from_secs(4)),
            Some(Duration::from_secs(4))
        );
    }

    #[test]
    fn slow_threshold() {
        assert!(!Job::new(JobId(1), 10).is_slow());
        assert!(Job::new(JobId(2), 11).is_slow());
    }
}
