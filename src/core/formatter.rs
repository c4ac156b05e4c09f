use std::time::Duration;

use crate::core::counters::Counters;
use crate::core::job::Job;

/// Width the job label is padded to so bars line up.
pub const LABEL_WIDTH: usize = 34;

pub fn format_status_line(counters: &Counters) -> String {
    format!(
        "Completed {} of {}",
        counters.completed, counters.started
    )
}

pub fn format_job_label(job: &Job) -> String {
    format!(
        "Task {} (completion time {} s)",
        job.id, job.duration_ticks
    )
}

pub fn format_job_started(job: &Job) -> String {
    format!(
        "Task {} started (completion time {} s)",
        job.id, job.duration_ticks
    )
}

pub fn format_job_progress(job: &Job) -> String {
    format!("Task {}: {}/{}", job.id, job.elapsed_ticks, job.duration_ticks)
}

pub fn format_job_completed(job: &Job, counters: &Counters) -> String {
    format!("Task {} completed. {}", job.id, format_status_line(counters))
}

/// Renders `[=====>    ]` for a ratio in `0.0..=1.0`.
pub fn render_progress_bar(ratio: f64, width: usize) -> String {
    let width = width.max(10);
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);

    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for idx in 0..width {
        if idx < filled {
            bar.push('=');
        } else if idx == filled && filled > 0 {
            bar.push('>');
        } else {
            bar.push(' ');
        }
    }
    bar.push(']');
    bar
}

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::JobId;

    #[test]
    fn status_line_reads_completed_of_started() {
        let counters = Counters {
            started: 3,
            completed: 1,
        };
        assert_eq!(format_status_line(&counters), "Completed 1 of 3");
        assert_eq!(format_status_line(&Counters::default()), "Completed 0 of 0");
    }

    #[test]
    fn job_label_matches_row_text() {
        let job = Job::new(JobId(12), 17);
        assert_eq!(format_job_label(&job), "Task 12 (completion time 17 s)");
        assert!(format_job_label(&job).len() <= LABEL_WIDTH);
    }

    #[test]
    fn progress_bar_fills_with_ratio() {
        assert_eq!(render_progress_bar(0.0, 10), "[          ]");
        assert_eq!(render_progress_bar(0.5, 10), "[=====>    ]");
        assert_eq!(render_progress_bar(1.0, 10), "[==========]");
        assert_eq!(render_progress_bar(7.0, 10), "[==========]");
    }

    #[test]
    fn progress_bar_has_minimum_width() {
        assert_eq!(render_progress_bar(0.0, 2).chars().count(), 12);
    }

    #[test]
    fn duration_is_clock_formatted() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "01:02:05");
    }
}
