//! Report command.

use crate::cli::args::ReportViewArg;
use crate::error::ReadtimeError;
use crate::features::report::{Report, ReportPeriod};
use crate::output::format_report;

use super::Context;

/// Execute report command
///
/// # Errors
///
/// Returns an error if the period is invalid or the store cannot be read.
pub fn report(ctx: &Context, period: Option<&str>, view: ReportViewArg) -> Result<String, ReadtimeError> {
    let period = match period {
        Some(p) => p.parse::<ReportPeriod>()?,
        None => ctx.config.report.default_period,
    };

    let tracker = ctx.open_tracker()?;
    let report = Report::generate(tracker.log(), tracker.today(), period, view.into());

    format_report(&report, ctx.config.report.bar_width, ctx.format)
}
