//! Import, export and reset of the tracker record.

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use crate::cli::args::OutputFormat;
use crate::error::ReadtimeError;
use crate::features::tracker::{import_local_storage, TimerPhase};
use crate::output::to_json;

use super::Context;

/// Execute import command
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if tracker data
/// exists and `force` is not set, or if the store cannot be written.
pub fn import(ctx: &Context, file: &Path, force: bool) -> Result<String, ReadtimeError> {
    let raw = std::fs::read_to_string(file).map_err(|e| {
        ReadtimeError::InvalidInput(format!("Failed to read {}: {e}", file.display()))
    })?;
    let state = import_local_storage(&raw)?;

    let mut tracker = ctx.open_tracker()?;
    let has_data = !tracker.log().is_empty() || tracker.phase() != TimerPhase::Idle;
    if has_data && !force {
        return Err(ReadtimeError::InvalidInput(
            "Tracker data already exists. Use --force to replace it".to_string(),
        ));
    }

    tracker.replace_state(state)?;

    let log = tracker.log();
    let days = log.reading_sessions.len();
    let sessions: usize = log.reading_sessions.values().map(Vec::len).sum();

    match ctx.format {
        OutputFormat::Json => to_json(&json!({
            "imported": true,
            "days": days,
            "reading_sessions": sessions,
            "status": tracker.status(),
        })),
        OutputFormat::Pretty => Ok(format!(
            "{} {sessions} reading sessions over {days} days",
            "Imported".green().bold()
        )),
    }
}

/// Execute export command
///
/// The record is always printed as JSON.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn export(ctx: &Context) -> Result<String, ReadtimeError> {
    ctx.open_tracker()?.export_json()
}

/// Execute reset command
///
/// # Errors
///
/// Returns an error if `force` is not set or the store cannot be written.
pub fn reset(ctx: &Context, force: bool) -> Result<String, ReadtimeError> {
    if !force {
        return Err(ReadtimeError::InvalidInput(
            "This deletes all reading history. Re-run with --force to confirm".to_string(),
        ));
    }

    ctx.open_tracker()?.reset_all()?;

    match ctx.format {
        OutputFormat::Json => to_json(&json!({ "reset": true })),
        OutputFormat::Pretty => Ok("All tracker data deleted".to_string()),
    }
}
