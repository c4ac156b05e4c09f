use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("session is shut down, no new jobs are accepted")]
    SessionClosed,
    #[error("invalid duration range {min}..{max} (need 1 <= min < max)")]
    InvalidRange { min: u32, max: u32 },
    #[error("job duration must be at least one tick")]
    InvalidDuration,
    #[error("invalid tick interval: {message}")]
    InvalidInterval { message: String },
    #[error("invalid command: {message}")]
    InvalidCommand { message: String },
    #[error("failed to spawn task runner: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("terminal error: {message}")]
    Terminal { message: String },
}

impl BoardError {
    pub fn terminal(err: impl std::fmt::Display) -> Self {
        BoardError::Terminal {
            message: err.to_string(),
        }
    }
}
