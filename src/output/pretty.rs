use chrono::NaiveDate;
use colored::Colorize;

use crate::core::format_clock;
use crate::features::tracker::{
    format_duration, format_hms, ConfirmOutcome, DismissOutcome, Session, StartOutcome,
    StatusSnapshot, StopOutcome, TimerPhase,
};

/// Status line shown for a phase.
#[must_use]
pub const fn phase_label(phase: &TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "Ready",
        TimerPhase::Reading { .. } => "Reading in progress...",
        TimerPhase::OnBreakPendingConfirmation { .. } => "On break",
    }
}

fn totals_line(reading_seconds: i64, break_seconds: i64) -> String {
    format!(
        "  {}: {}   {}: {}",
        "Reading".dimmed(),
        format_duration(reading_seconds).green(),
        "Breaks".dimmed(),
        format_duration(break_seconds).yellow()
    )
}

/// Format the result of a start.
#[must_use]
pub fn format_start_pretty(outcome: &StartOutcome) -> String {
    match outcome {
        StartOutcome::Started { since } => {
            format!("▶ {} at {}", "Reading started".green().bold(), format_clock(*since))
        }
        StartOutcome::AlreadyReading { since } => {
            format!("Already reading since {}", format_clock(*since))
        }
        StartOutcome::BreakConfirmationRequired {
            since,
            break_seconds,
        } => {
            let mut output = format!(
                "☕ {} since {} ({})\n",
                "On break".yellow().bold(),
                format_clock(*since),
                format_duration(*break_seconds)
            );
            output.push_str("  What did you do during your break?\n");
            output.push_str(&format!(
                "  {}",
                "readtime break confirm -a walk,snack".cyan()
            ));
            output
        }
    }
}

/// Format the result of a stop.
#[must_use]
pub fn format_stop_pretty(outcome: &StopOutcome) -> String {
    match outcome {
        StopOutcome::Stopped { session, totals } => {
            let mut output = format!(
                "⏹ {}: {}\n",
                "Session completed".bold(),
                format_duration(session.duration_seconds)
            );
            output.push_str(&totals_line(totals.reading_seconds, totals.break_seconds));
            output
        }
        StopOutcome::NotReading => "Not reading".dimmed().to_string(),
    }
}

/// Format the result of a break confirmation.
#[must_use]
pub fn format_confirm_pretty(outcome: &ConfirmOutcome) -> String {
    match outcome {
        ConfirmOutcome::Resumed { session, .. } => format!(
            "{}\n▶ {}",
            session.history_line(),
            "Reading resumed...".green().bold()
        ),
        ConfirmOutcome::NoBreakPending => "No break pending".dimmed().to_string(),
    }
}

/// Format the result of a dismissed prompt.
#[must_use]
pub fn format_dismiss_pretty(outcome: &DismissOutcome) -> String {
    match outcome {
        DismissOutcome::Dismissed { break_seconds } => format!(
            "Prompt dismissed, still on break ({})",
            format_duration(*break_seconds)
        ),
        DismissOutcome::NoBreakPending => "No break pending".dimmed().to_string(),
    }
}

/// Format the tracker status.
#[must_use]
pub fn format_status_pretty(status: &StatusSnapshot) -> String {
    let label = phase_label(&status.phase);
    let label = match status.phase {
        TimerPhase::Idle => label.white().bold(),
        TimerPhase::Reading { .. } => label.green().bold(),
        TimerPhase::OnBreakPendingConfirmation { .. } => label.yellow().bold(),
    };

    let mut output = format!("{label}\n");

    match status.phase {
        TimerPhase::Reading { since } => {
            output.push_str(&format!(
                "  {}  (since {})\n",
                format_hms(status.elapsed_seconds).bold(),
                format_clock(since)
            ));
        }
        TimerPhase::OnBreakPendingConfirmation { since } => {
            output.push_str(&format!(
                "  {}  (stopped at {})\n",
                format_hms(status.pending_break_seconds.unwrap_or(0)).bold(),
                format_clock(since)
            ));
        }
        TimerPhase::Idle => output.push_str(&format!("  {}\n", format_hms(0).dimmed())),
    }

    output.push_str(&totals_line(
        status.totals.reading_seconds,
        status.totals.break_seconds,
    ));
    output.push_str(&format!(
        "\n  {}: {} ({})",
        "Sessions".dimmed(),
        status.sessions_today,
        status.today
    ));

    output
}

/// Format a day's history list.
#[must_use]
pub fn format_history_pretty(date: NaiveDate, sessions: &[Session]) -> String {
    let title = format!("Sessions for {date}");
    if sessions.is_empty() {
        return format!("{title} (0)\n  No sessions recorded");
    }

    let mut output = format!("{title} ({})\n", sessions.len());
    output.push_str(&"─".repeat(50));
    output.push('\n');

    for session in sessions {
        let line = session.history_line();
        let line = if session.is_break() {
            line.yellow()
        } else {
            line.normal()
        };
        output.push_str(&format!("  {line}\n"));
    }

    output.trim_end().to_string()
}
