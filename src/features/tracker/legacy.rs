//! Import of the browser tracker's local-storage dump.
//!
//! The browser kept each field under its own local-storage key, every value
//! a string. Those keys are exactly the record's field names, so the dump is
//! read with the record's own lenient field parser.

use serde_json::Value;
use tracing::{debug, info};

use super::state::{keys, TrackerState};
use crate::error::ReadtimeError;

/// Build a record from a `JSON.stringify(localStorage)` dump.
///
/// # Errors
///
/// Returns an error if the input is not a JSON object or carries none of the
/// tracker's keys. Individual malformed values fall back to defaults.
pub fn import_local_storage(raw: &str) -> Result<TrackerState, ReadtimeError> {
    let value: Value = serde_json::from_str(raw)?;

    let Value::Object(fields) = value else {
        return Err(ReadtimeError::InvalidInput(
            "Local storage dump must be a JSON object".to_string(),
        ));
    };

    let known = keys::ALL
        .iter()
        .filter(|key| fields.contains_key(**key))
        .count();

    if known == 0 {
        return Err(ReadtimeError::InvalidInput(
            "No reading tracker data found in the dump".to_string(),
        ));
    }

    for key in fields.keys().filter(|k| !keys::ALL.contains(&k.as_str())) {
        debug!(key = %key, "ignoring unrelated local storage key");
    }

    let state = TrackerState::from_fields(&fields);
    info!(
        keys = known,
        days = state.log.reading_sessions.len(),
        "imported local storage dump"
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tracker::state::TimerPhase;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    // Shape produced by JSON.stringify(localStorage) in the browser tracker
    const DUMP: &str = r#"{
        "theme": "dark",
        "is_reading": "false",
        "reading_start_time": "",
        "last_stop_time": "1781080200000",
        "total_reading_seconds": "1800",
        "total_break_seconds": "300.4",
        "first_start_today": "2026-06-10",
        "last_reset_date": "2026-06-10",
        "reading_sessions": "{\"2026-06-09\":[{\"start\":1780992000000,\"end\":1780993200000,\"duration\":1200}],\"2026-06-10\":[{\"start\":1781078400000,\"end\":1781080200000,\"duration\":1800}]}",
        "todays_sessions": "{\"2026-06-10\":[{\"start\":1781078400000,\"end\":1781080200000,\"duration\":1800},{\"type\":\"break\",\"activities\":[\"walk\"]}]}",
        "break_activities": "{\"2026-06-09\":{\"walk\":300,\"snack\":120}}"
    }"#;

    #[test]
    fn test_import_browser_dump() {
        let state = import_local_storage(DUMP).unwrap();

        assert!(!state.is_reading);
        assert_eq!(state.reading_start_time, None);
        assert!(matches!(
            state.phase(),
            TimerPhase::OnBreakPendingConfirmation { .. }
        ));
        assert_eq!(state.total_reading_seconds, 1800);
        assert_eq!(state.total_break_seconds, 300);
        assert_eq!(state.first_start_today, Some(date(10)));
        assert_eq!(state.last_reset_date, Some(date(10)));

        assert_eq!(state.log.reading_on(date(9))[0].duration_seconds, 1200);
        assert_eq!(state.log.reading_on(date(10)).len(), 1);
        // The break entry without timestamps is skipped
        assert_eq!(state.log.day(date(10)).len(), 1);
        assert_eq!(state.log.break_activities[&date(9)]["snack"], 120);
    }

    #[test]
    fn test_import_reading_in_progress() {
        let dump = r#"{"is_reading": "true", "reading_start_time": "1781078400000"}"#;
        let state = import_local_storage(dump).unwrap();

        assert!(matches!(state.phase(), TimerPhase::Reading { .. }));
    }

    #[test]
    fn test_import_corrupt_log_keeps_other_fields() {
        let dump = r#"{"total_reading_seconds": "60", "reading_sessions": "{not json"}"#;
        let state = import_local_storage(dump).unwrap();

        assert_eq!(state.total_reading_seconds, 60);
        assert!(state.log.reading_sessions.is_empty());
    }

    #[test]
    fn test_import_rejects_non_object() {
        assert!(matches!(
            import_local_storage("[]"),
            Err(ReadtimeError::InvalidInput(_))
        ));
        assert!(matches!(
            import_local_storage("nope"),
            Err(ReadtimeError::Parse(_))
        ));
    }

    #[test]
    fn test_import_rejects_unrelated_dump() {
        let result = import_local_storage(r#"{"theme": "dark"}"#);
        assert!(matches!(result, Err(ReadtimeError::InvalidInput(_))));
    }
}
