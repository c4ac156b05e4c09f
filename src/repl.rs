use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::cli::{self, SessionCommand};
use crate::core::config::SessionConfig;
use crate::core::controller::Session;
use crate::core::error::BoardError;
use crate::core::event::JobEvent;
use crate::core::formatter::{format_job_completed, format_job_progress, format_job_started};
use crate::core::job::TickOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(config: SessionConfig, initial_jobs: u32) -> Result<(), BoardError> {
    let (mut session, events_rx) = Session::new(config)?;
    let (line_tx, line_rx) = mpsc::channel::<String>();

    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .map_err(BoardError::terminal)?;

    let mut stdout = io::stdout();
    start_jobs(&mut stdout, &mut session, initial_jobs)?;
    drive(&mut stdout, &mut session, &events_rx, &line_rx)
}

/// Runs until `quit`, or until input ends and every job has completed.
fn drive<W: Write>(
    out: &mut W,
    session: &mut Session,
    events_rx: &Receiver<JobEvent>,
    line_rx: &Receiver<String>,
) -> Result<(), BoardError> {
    let mut input_open = true;

    loop {
        match events_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => report_event(out, session, event)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        while let Ok(event) = events_rx.try_recv() {
            report_event(out, session, event)?;
        }

        while input_open {
            match line_rx.try_recv() {
                Ok(line) => {
                    if handle_line(out, session, &line)? == Flow::Quit {
                        session.shutdown();
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => input_open = false,
            }
        }

        if !input_open && session.is_idle() {
            break;
        }
    }

    session.shutdown();
    Ok(())
}

fn report_event<W: Write>(
    out: &mut W,
    session: &mut Session,
    event: JobEvent,
) -> Result<(), BoardError> {
    let outcome = session.handle_event(event);
    let Some(job) = session.job(event.job_id()) else {
        return Ok(());
    };
    let written = match outcome {
        TickOutcome::Advanced => writeln!(out, "{}", format_job_progress(job)),
        TickOutcome::Completed => {
            writeln!(out, "{}", format_job_completed(job, &session.counters()))
        }
        TickOutcome::Ignored => Ok(()),
    };
    written.map_err(BoardError::terminal)
}

fn start_jobs<W: Write>(out: &mut W, session: &mut Session, count: u32) -> Result<(), BoardError> {
    for _ in 0..count {
        match session.start_job() {
            Ok(id) => {
                if let Some(job) = session.job(id) {
                    writeln!(out, "{}", format_job_started(job)).map_err(BoardError::terminal)?;
                }
            }
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }
    Ok(())
}

fn handle_line<W: Write>(out: &mut W, session: &mut Session, line: &str) -> Result<Flow, BoardError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Flow::Continue);
    }

    if trimmed.eq_ignore_ascii_case("help") {
        for line in cli::HELP_LINES {
            writeln!(out, "{line}").map_err(BoardError::terminal)?;
        }
        return Ok(Flow::Continue);
    }

    match cli::parse_line(trimmed) {
        Ok(SessionCommand::Start { count }) => start_jobs(out, session, count)?,
        Ok(SessionCommand::Status) => {
            writeln!(out, "{}", session.status_line()).map_err(BoardError::terminal)?;
        }
        Ok(SessionCommand::Clear) => {
            let removed = session.clear_completed();
            writeln!(out, "Removed {removed} completed jobs.").map_err(BoardError::terminal)?;
        }
        Ok(SessionCommand::Quit) => return Ok(Flow::Quit),
        Err(err) => eprintln!("{err}"),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_session() -> (Session, Receiver<JobEvent>) {
        Session::new(SessionConfig {
            min_ticks: 1,
            max_ticks: 4,
            tick_interval: Duration::from_millis(2),
            seed: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn runs_jobs_to_completion_after_input_ends() {
        let (mut session, events_rx) = fast_session();
        let (line_tx, line_rx) = mpsc::channel();
        line_tx.send("start 2".to_string()).unwrap();
        line_tx.send("status".to_string()).unwrap();
        drop(line_tx);

        let mut out = Vec::new();
        drive(&mut out, &mut session, &events_rx, &line_rx).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Task 1 started"));
        assert!(text.contains("Task 2 started"));
        assert!(text.contains("Completed 0 of 2"));
        assert!(text.trim_end().ends_with("Completed 2 of 2"));
        assert_eq!(text.matches(" completed. ").count(), 2);
    }

    #[test]
    fn quit_stops_immediately() {
        let (mut session, events_rx) = fast_session();
        let (line_tx, line_rx) = mpsc::channel();
        line_tx.send("quit".to_string()).unwrap();

        let mut out = Vec::new();
        drive(&mut out, &mut session, &events_rx, &line_rx).unwrap();
        assert!(!session.is_accepting());
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_commands() {
        let (mut session, _rx) = fast_session();
        let mut out = Vec::new();
        assert_eq!(handle_line(&mut out, &mut session, "help").unwrap(), Flow::Continue);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("start [COUNT]"));
    }
}
