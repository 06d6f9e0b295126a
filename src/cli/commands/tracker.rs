//! Timer commands.

use crate::cli::args::BreakCommands;
use crate::core::parse_past_date;
use crate::error::ReadtimeError;
use crate::output::{
    format_confirm, format_dismiss, format_history, format_start, format_status, format_stop,
};

use super::Context;

/// Execute start command
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn start(ctx: &Context) -> Result<String, ReadtimeError> {
    let mut tracker = ctx.open_tracker()?;
    let outcome = tracker.start()?;
    format_start(&outcome, ctx.format)
}

/// Execute stop command
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn stop(ctx: &Context) -> Result<String, ReadtimeError> {
    let mut tracker = ctx.open_tracker()?;
    let outcome = tracker.stop()?;
    format_stop(&outcome, ctx.format)
}

/// Execute break subcommands
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn break_command(ctx: &Context, cmd: BreakCommands) -> Result<String, ReadtimeError> {
    let mut tracker = ctx.open_tracker()?;

    match cmd {
        BreakCommands::Confirm { activities } => {
            let outcome = tracker.confirm_break(activities)?;
            format_confirm(&outcome, ctx.format)
        }
        BreakCommands::Dismiss => format_dismiss(&tracker.dismiss_break(), ctx.format),
    }
}

/// Execute status command
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn status(ctx: &Context) -> Result<String, ReadtimeError> {
    let tracker = ctx.open_tracker()?;
    format_status(&tracker.status(), ctx.format)
}

/// Execute history command
///
/// # Errors
///
/// Returns an error if the date cannot be parsed or the store cannot be read.
pub fn history(ctx: &Context, date: Option<&str>) -> Result<String, ReadtimeError> {
    let tracker = ctx.open_tracker()?;
    let today = tracker.today();

    let date = match date {
        Some(input) => parse_past_date(input, today)
            .ok_or_else(|| ReadtimeError::InvalidInput(format!("Could not parse date: {input}")))?,
        None => today,
    };

    format_history(date, tracker.sessions_on(date), ctx.format)
}
