use crate::core::job::JobId;

/// Messages sent from task runners to the session's UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    /// `tick` counts from 1 up to the job's duration.
    Tick { job_id: JobId, tick: u32 },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::Tick { job_id, .. } => *job_id,
        }
    }
}
