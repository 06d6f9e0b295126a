//! Daily rollover of the running totals.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ReadtimeError;

/// When the daily reset is allowed to fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolloverPolicy {
    /// Whenever the last reset date is before today, at any time of day.
    #[default]
    CatchUp,
    /// Only during the local 00:00 minute.
    Midnight,
}

impl RolloverPolicy {
    /// Name used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CatchUp => "catch-up",
            Self::Midnight => "midnight",
        }
    }
}

impl FromStr for RolloverPolicy {
    type Err = ReadtimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catch-up" | "catchup" => Ok(Self::CatchUp),
            "midnight" => Ok(Self::Midnight),
            other => Err(ReadtimeError::InvalidInput(format!(
                "Invalid rollover policy: {other}. Use 'catch-up' or 'midnight'"
            ))),
        }
    }
}

/// Check whether a reset should fire at `now`.
#[must_use]
pub fn is_due(policy: RolloverPolicy, last_reset: Option<NaiveDate>, now: DateTime<Local>) -> bool {
    let stale = last_reset.map_or(true, |date| date < now.date_naive());

    match policy {
        RolloverPolicy::CatchUp => stale,
        RolloverPolicy::Midnight => stale && now.hour() == 0 && now.minute() == 0,
    }
}

/// The day whose history list a reset at `today` clears.
#[must_use]
pub fn previous_day(last_reset: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    last_reset
        .or_else(|| today.pred_opt())
        .unwrap_or(today)
}
