use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::error::BoardError;

pub const LOG_ENV: &str = "JOBBOARD_LOG";
const DEFAULT_FILTER: &str = "jobboard=info";

/// Installs the global subscriber. Without a log file everything goes to a
/// sink so the terminal UI stays clean.
pub fn init(log_file: Option<&Path>) -> Result<(), BoardError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.into());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| BoardError::Terminal {
                    message: format!("cannot open log file '{}': {e}", path.display()),
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_thread_names(true)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .map_err(BoardError::terminal)?;
        }
        None => {
            tracing_subscriber::registry()
                .with(EnvFilter::new("off"))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                .try_init()
                .map_err(BoardError::terminal)?;
        }
    }

    Ok(())
}
