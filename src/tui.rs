use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Terminal;

use crate::cli::{self, SessionCommand};
use crate::core::config::SessionConfig;
use crate::core::controller::Session;
use crate::core::error::BoardError;
use crate::core::event::JobEvent;
use crate::core::formatter::{
    format_duration, format_job_completed, format_job_label, format_job_started,
    render_progress_bar, LABEL_WIDTH,
};
use crate::core::job::{Job, JobStatus, TickOutcome};

const BUTTON_LABEL: &str = "[ Start background job ]";

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, BoardError> {
        enable_raw_mode().map_err(BoardError::terminal)?;
        let mut stdout = io::stdout();
        stdout
            .execute(EnterAlternateScreen)
            .map_err(BoardError::terminal)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

#[derive(Debug)]
struct AppState {
    input: String,
    history: Vec<String>,
    should_quit: bool,
    scroll_offset: usize,
    view_lines: usize,
    job_rows: usize,
    opened_at: Instant,
}

impl AppState {
    fn new() -> Self {
        Self {
            input: String::new(),
            history: vec!["Press Enter to start a background job. Type 'help' for commands.".to_string()],
            should_quit: false,
            scroll_offset: 0,
            view_lines: 1,
            job_rows: 0,
            opened_at: Instant::now(),
        }
    }

    fn push_history(&mut self, line: impl Into<String>) {
        const MAX_LINES: usize = 500;
        if self.history.len() >= MAX_LINES {
            let drain_count = self.history.len().saturating_sub(MAX_LINES - 1);
            self.history.drain(0..drain_count);
        }
        self.history.push(line.into());
    }

    fn sync_rows(&mut self, job_rows: usize) {
        self.job_rows = job_rows;
        self.clamp_scroll();
    }

    fn set_view_lines(&mut self, lines: usize) {
        self.view_lines = lines.max(1);
        self.clamp_scroll();
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.max_scroll();
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    fn scroll_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn scroll_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn max_scroll(&self) -> usize {
        self.job_rows.saturating_sub(self.view_lines)
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.max_scroll();
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }
    }
}

pub fn run(config: SessionConfig, initial_jobs: u32) -> Result<(), BoardError> {
    let (mut session, events_rx) = Session::new(config)?;
    let mut app = AppState::new();
    if initial_jobs > 0 {
        start_jobs(&mut app, &mut session, initial_jobs);
    }

    let _guard = TerminalGuard::enter()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(BoardError::terminal)?;

    loop {
        while let Ok(event) = events_rx.try_recv() {
            apply_event(&mut app, &mut session, event);
        }
        app.sync_rows(session.job_count());

        let size = terminal.size().map_err(BoardError::terminal)?;
        let jobs_height = size.height.saturating_sub(4 + 8 + 3).max(3) as usize;
        app.set_view_lines(jobs_height.saturating_sub(2).max(1));

        terminal
            .draw(|frame| {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(4),
                        Constraint::Min(3),
                        Constraint::Length(8),
                        Constraint::Length(3),
                    ])
                    .split(frame.size());

                frame.render_widget(render_header(&app, &session), layout[0]);

                let jobs = render_jobs(&app, &session, layout[1].width as usize);
                frame.render_widget(jobs, layout[1]);

                let log = render_history(&app, layout[2].height as usize);
                frame.render_widget(log, layout[2]);

                let input = Paragraph::new(app.input.as_str())
                    .block(Block::default().title("Command").borders(Borders::ALL));
                frame.render_widget(input, layout[3]);
                frame.set_cursor(layout[3].x + 1 + app.input.len() as u16, layout[3].y + 1);
            })
            .map_err(BoardError::terminal)?;

        if event::poll(Duration::from_millis(50)).map_err(BoardError::terminal)? {
            if let Event::Key(key) = event::read().map_err(BoardError::terminal)? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    KeyCode::Char(ch) => {
                        app.input.push(ch);
                    }
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Enter => {
                        let line = app.input.trim().to_string();
                        app.input.clear();
                        handle_line(&mut app, &mut session, &line);
                    }
                    KeyCode::PageUp => {
                        let step = app.view_lines.saturating_sub(1).max(1);
                        app.scroll_up(step);
                    }
                    KeyCode::PageDown => {
                        let step = app.view_lines.saturating_sub(1).max(1);
                        app.scroll_down(step);
                    }
                    KeyCode::Up => app.scroll_up(1),
                    KeyCode::Down => app.scroll_down(1),
                    KeyCode::Home => app.scroll_top(),
                    KeyCode::End => app.scroll_bottom(),
                    KeyCode::Esc => {
                        app.should_quit = true;
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    session.shutdown();
    Ok(())
}

fn apply_event(app: &mut AppState, session: &mut Session, event: JobEvent) {
    if session.handle_event(event) == TickOutcome::Completed {
        if let Some(job) = session.job(event.job_id()) {
            app.push_history(format_job_completed(job, &session.counters()));
        }
    }
}

fn start_jobs(app: &mut AppState, session: &mut Session, count: u32) {
    for _ in 0..count {
        match session.start_job() {
            Ok(id) => {
                if let Some(job) = session.job(id) {
                    app.push_history(format_job_started(job));
                }
            }
            Err(err) => {
                app.push_history(format!("error: {err}"));
                break;
            }
        }
    }
    app.sync_rows(session.job_count());
}

fn handle_line(app: &mut AppState, session: &mut Session, line: &str) {
    let trimmed = line.trim();

    // An empty line presses the button.
    if trimmed.is_empty() {
        start_jobs(app, session, 1);
        return;
    }

    app.push_history(format!(">> {trimmed}"));

    if trimmed.eq_ignore_ascii_case("help") {
        for line in cli::HELP_LINES {
            app.push_history(line);
        }
        return;
    }

    match cli::parse_line(trimmed) {
        Ok(SessionCommand::Start { count }) => start_jobs(app, session, count),
        Ok(SessionCommand::Status) => app.push_history(session.status_line()),
        Ok(SessionCommand::Clear) => {
            let removed = session.clear_completed();
            app.sync_rows(session.job_count());
            app.push_history(format!("Removed {removed} completed jobs."));
        }
        Ok(SessionCommand::Quit) => app.should_quit = true,
        Err(err) => {
            let message = err.to_string();
            let first = message.lines().next().unwrap_or_default().to_string();
            app.push_history(first);
        }
    }
}

fn render_header(app: &AppState, session: &Session) -> Paragraph<'static> {
    let button_style = if session.is_accepting() {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = vec![
        Line::from(vec![
            Span::styled(BUTTON_LABEL, button_style),
            Span::raw("  "),
            Span::raw(session.status_line()),
        ]),
        Line::from(vec![
            Span::raw("Uptime: "),
            Span::raw(format_duration(app.opened_at.elapsed())),
            Span::raw(format!(
                "  tick: {}ms",
                session.config().tick_interval.as_millis()
            )),
        ]),
    ];

    Paragraph::new(text)
        .block(Block::default().title("jobboard").borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

fn job_style(job: &Job) -> Style {
    match job.status {
        JobStatus::Completed => Style::default().fg(Color::Green),
        _ if job.is_slow() => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::Cyan),
    }
}

fn render_job_row(job: &Job, bar_width: usize, now: Instant) -> Line<'static> {
    let label = format!("{:<width$}", format_job_label(job), width = LABEL_WIDTH);
    let bar = render_progress_bar(job.ratio(), bar_width);
    let wall = job
        .wall_time(now)
        .map(format_duration)
        .unwrap_or_else(|| "--:--:--".to_string());
    Line::from(vec![
        Span::raw(label),
        Span::styled(bar, job_style(job)),
        Span::raw(format!(" {}/{}", job.elapsed_ticks, job.duration_ticks)),
        Span::raw(format!("  {wall}")),
    ])
}

fn render_jobs(app: &AppState, session: &Session, width: usize) -> Paragraph<'static> {
    let bar_width = width.saturating_sub(LABEL_WIDTH + 2 + 2 + 8 + 10);
    let now = Instant::now();
    let lines: Vec<Line> = session
        .jobs()
        .skip(app.scroll_offset)
        .take(app.view_lines)
        .map(|job| render_job_row(job, bar_width, now))
        .collect();

    let title = format!("Jobs ({})", session.job_count());
    Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL))
}

fn render_history(app: &AppState, height: usize) -> Paragraph<'static> {
    let max_lines = height.saturating_sub(2).max(1);
    let start = app.history.len().saturating_sub(max_lines);
    let lines: Vec<Line> = app.history[start..]
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect();

    Paragraph::new(lines)
        .block(Block::default().title("Session").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
}
