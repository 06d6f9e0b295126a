//! Output formatting for readtime.
//!
//! This module provides formatters for displaying tracker results in various formats.

mod json;
mod pretty;

use chrono::NaiveDate;

use crate::cli::args::OutputFormat;
use crate::error::ReadtimeError;
use crate::features::report::Report;
use crate::features::tracker::{
    ConfirmOutcome, DismissOutcome, Session, StartOutcome, StatusSnapshot, StopOutcome,
};

pub use json::*;
pub use pretty::*;

/// Format the result of a start based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_start(outcome: &StartOutcome, format: OutputFormat) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_start_pretty(outcome)),
        OutputFormat::Json => to_json(outcome),
    }
}

/// Format the result of a stop based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_stop(outcome: &StopOutcome, format: OutputFormat) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_stop_pretty(outcome)),
        OutputFormat::Json => to_json(outcome),
    }
}

/// Format the result of a break confirmation based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_confirm(outcome: &ConfirmOutcome, format: OutputFormat) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_confirm_pretty(outcome)),
        OutputFormat::Json => to_json(outcome),
    }
}

/// Format the result of a dismissed prompt based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_dismiss(outcome: &DismissOutcome, format: OutputFormat) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_dismiss_pretty(outcome)),
        OutputFormat::Json => to_json(outcome),
    }
}

/// Format the tracker status based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_status(status: &StatusSnapshot, format: OutputFormat) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(status)),
        OutputFormat::Json => to_json(status),
    }
}

/// Format a day's history list based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_history(
    date: NaiveDate,
    sessions: &[Session],
    format: OutputFormat,
) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(date, sessions)),
        OutputFormat::Json => format_history_json(date, sessions),
    }
}

/// Format a report based on output format
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_report(
    report: &Report,
    bar_width: usize,
    format: OutputFormat,
) -> Result<String, ReadtimeError> {
    match format {
        OutputFormat::Pretty => Ok(report.format(bar_width)),
        OutputFormat::Json => to_json(report),
    }
}
