//! JSON output formatting for readtime.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use crate::error::ReadtimeError;
use crate::features::tracker::Session;

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReadtimeError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a day's history list as JSON.
///
/// # Errors
///
/// Returns `ReadtimeError::Parse` if JSON serialization fails.
pub fn format_history_json(date: NaiveDate, sessions: &[Session]) -> Result<String, ReadtimeError> {
    let reading: i64 = sessions
        .iter()
        .filter(|s| !s.is_break())
        .map(|s| s.duration_seconds)
        .sum();
    let breaks: i64 = sessions
        .iter()
        .filter(|s| s.is_break())
        .map(|s| s.duration_seconds)
        .sum();

    let output = json!({
        "date": date,
        "count": sessions.len(),
        "reading_seconds": reading,
        "break_seconds": breaks,
        "items": sessions
    });
    to_json(&output)
}
