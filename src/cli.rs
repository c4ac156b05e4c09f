use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::core::config::{SessionConfig, DEFAULT_MAX_TICKS, DEFAULT_MIN_TICKS};
use crate::core::error::BoardError;
use crate::core::interval::parse_interval;

#[derive(Debug, Parser)]
#[command(name = "jobboard", version, about = "Board of simulated background jobs")]
pub struct Cli {
    /// Line-oriented frontend reading commands from stdin
    #[arg(long, env = "JOBBOARD_PLAIN")]
    pub plain: bool,

    /// Number of jobs to start at launch
    #[arg(
        long,
        value_name = "N",
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_START_COUNT as i64),
        env = "JOBBOARD_START"
    )]
    pub start: u32,

    /// Shortest job duration in ticks (inclusive)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_TICKS, env = "JOBBOARD_MIN_TICKS")]
    pub min_ticks: u32,

    /// Longest job duration in ticks (exclusive)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_TICKS, env = "JOBBOARD_MAX_TICKS")]
    pub max_ticks: u32,

    /// Tick interval, e.g. 1s, 250ms
    #[arg(long, value_name = "INTERVAL", default_value = "1s", value_parser = parse_tick, env = "JOBBOARD_TICK")]
    pub tick: Duration,

    /// Seed for reproducible job durations
    #[arg(long, value_name = "N", env = "JOBBOARD_SEED")]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH", env = "JOBBOARD_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Most jobs a single start request may spawn.
pub const MAX_START_COUNT: u32 = 100;

fn parse_tick(value: &str) -> Result<Duration, String> {
    parse_interval(value).map_err(|err| err.to_string())
}

impl Cli {
    pub fn session_config(&self) -> Result<SessionConfig, BoardError> {
        let config = SessionConfig {
            min_ticks: self.min_ticks,
            max_ticks: self.max_ticks,
            tick_interval: self.tick,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Commands typed into a running session.
#[derive(Debug, Parser)]
#[command(name = "jobboard", disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Start background jobs
    Start {
        #[arg(
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..=MAX_START_COUNT as i64)
        )]
        count: u32,
    },
    /// Show completed and started totals
    Status,
    /// Remove completed jobs from the list
    Clear,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

pub fn parse_line(line: &str) -> Result<SessionCommand, BoardError> {
    let invalid = |message: String| BoardError::InvalidCommand { message };

    let mut argv = Vec::new();
    argv.push("jobboard".to_string());
    let tokens = shell_words::split(line).map_err(|err| invalid(err.to_string()))?;
    argv.extend(tokens);

    let parsed = CommandLine::try_parse_from(argv).map_err(|err| invalid(err.to_string()))?;
    Ok(parsed.command)
}

pub const HELP_LINES: [&str; 6] = [
    "Commands:",
    "  <Enter>         start a background job",
    "  start [COUNT]   start COUNT background jobs",
    "  status          show completed/started totals",
    "  clear           remove completed jobs from the list",
    "  quit / exit     leave the session",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_line("start").unwrap(), SessionCommand::Start { count: 1 });
        assert_eq!(parse_line("start 4").unwrap(), SessionCommand::Start { count: 4 });
        assert_eq!(parse_line("status").unwrap(), SessionCommand::Status);
        assert_eq!(parse_line("clear").unwrap(), SessionCommand::Clear);
        assert_eq!(parse_line("quit").unwrap(), SessionCommand::Quit);
        assert_eq!(parse_line("exit").unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(matches!(
            parse_line("launch"),
            Err(BoardError::InvalidCommand { .. })
        ));
        assert!(parse_line("start many").is_err());
        assert!(parse_line("start \"unterminated").is_err());
    }

    #[test]
    fn start_count_is_capped() {
        assert_eq!(
            parse_line("start 100").unwrap(),
            SessionCommand::Start { count: MAX_START_COUNT }
        );
        assert!(matches!(
            parse_line("start 101"),
            Err(BoardError::InvalidCommand { .. })
        ));
        assert!(parse_line("start 4000000000").is_err());
        assert!(parse_line("start 0").is_err());
        assert!(Cli::try_parse_from(["jobboard", "--start", "101"]).is_err());
    }

    #[test]
    fn cli_defaults_build_a_valid_config() {
        let cli = Cli::try_parse_from(["jobboard"]).unwrap();
        let config = cli.session_config().unwrap();
        assert_eq!(config, SessionConfig::default());
        assert!(!cli.plain);
        assert_eq!(cli.start, 0);
    }

    #[test]
    fn cli_options_override_defaults() {
        let cli = Cli::try_parse_from([
            "jobboard", "--plain", "--start", "2", "--min-ticks", "1", "--max-ticks", "3",
            "--tick", "10ms", "--seed", "7",
        ])
        .unwrap();
        let config = cli.session_config().unwrap();
        assert!(cli.plain);
        assert_eq!(cli.start, 2);
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!((config.min_ticks, config.max_ticks, config.seed), (1, 3, Some(7)));
    }

    #[test]
    fn cli_rejects_bad_range_and_interval() {
        let cli = Cli::try_parse_from(["jobboard", "--min-ticks", "9", "--max-ticks", "9"]).unwrap();
        assert!(matches!(
            cli.session_config(),
            Err(BoardError::InvalidRange { min: 9, max: 9 })
        ));
        assert!(Cli::try_parse_from(["jobboard", "--tick", "0s"]).is_err());
    }
}
