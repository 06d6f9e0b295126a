//! Completed reading and break sessions.

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::timer::format_duration;
use crate::core::format_clock;

/// What a session recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Time spent reading.
    #[default]
    Reading,
    /// Time between a stop and the confirmation of the break.
    Break,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading"),
            Self::Break => write!(f, "Break"),
        }
    }
}

/// One completed interval. Never mutated once recorded.
///
/// Timestamps serialize as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// When the interval began.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    /// When the interval ended; never before `start`.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
    /// Whole seconds between `start` and `end`, rounded down.
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    /// Reading or break.
    #[serde(rename = "type", default)]
    pub kind: SessionKind,
    /// Break activity labels, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
}

impl Session {
    /// Create a session. An `end` earlier than `start` is clamped to `start`.
    #[must_use]
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        kind: SessionKind,
        activities: Vec<String>,
    ) -> Self {
        let end = end.max(start);

        Self {
            start,
            end,
            duration_seconds: (end - start).num_seconds(),
            kind,
            activities,
        }
    }

    /// A reading session.
    #[must_use]
    pub fn reading(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(start, end, SessionKind::Reading, Vec::new())
    }

    /// A break session tagged with its activities.
    #[must_use]
    pub fn break_with(start: DateTime<Utc>, end: DateTime<Utc>, activities: Vec<String>) -> Self {
        Self::new(start, end, SessionKind::Break, activities)
    }

    /// Re-derive the duration from the timestamps.
    ///
    /// Returns `None` for sessions whose end precedes their start.
    #[must_use]
    pub fn sanitized(self) -> Option<Self> {
        if self.end < self.start {
            return None;
        }
        Some(Self::new(self.start, self.end, self.kind, self.activities))
    }

    /// Check if this is a break.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self.kind, SessionKind::Break)
    }

    /// Duration in fractional minutes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }

    /// Local hour of day (0-23) the session started in.
    #[must_use]
    pub fn start_hour(&self) -> u32 {
        self.start.with_timezone(&Local).hour()
    }

    /// The history list line for this session.
    ///
    /// Reading: `09:00 — 09:30 (0h 30m 0s)`.
    /// Break: `Break (09:30 — 09:35): walk, snack`.
    #[must_use]
    pub fn history_line(&self) -> String {
        let start = format_clock(self.start);
        let end = format_clock(self.end);

        match self.kind {
            SessionKind::Reading => {
                format!("{start} — {end} ({})", format_duration(self.duration_seconds))
            }
            SessionKind::Break => {
                let activities = if self.activities.is_empty() {
                    "No activities selected".to_string()
                } else {
                    self.activities.join(", ")
                };
                format!("Break ({start} — {end}): {activities}")
            }
        }
    }
}

/// Drop millisecond fractions so stored timestamps round-trip exactly.
#[must_use]
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

/// Trim labels, drop empty ones and remove duplicates, keeping first-seen order.
#[must_use]
pub fn normalize_activities<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();

    for label in labels {
        let label = label.as_ref().trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_781_078_400_000).unwrap()
    }

    #[test]
    fn test_duration_rounds_down() {
        let session = Session::reading(t0(), t0() + Duration::milliseconds(90_999));
        assert_eq!(session.duration_seconds, 90);
    }

    #[test]
    fn test_end_before_start_is_clamped() {
        let session = Session::reading(t0(), t0() - Duration::seconds(5));
        assert_eq!(session.end, session.start);
        assert_eq!(session.duration_seconds, 0);
    }

    #[test]
    fn test_sanitized_recomputes_duration() {
        let mut session = Session::reading(t0(), t0() + Duration::seconds(60));
        session.duration_seconds = 9999;

        let fixed = session.sanitized().unwrap();
        assert_eq!(fixed.duration_seconds, 60);
    }

    #[test]
    fn test_sanitized_rejects_inverted() {
        let mut session = Session::reading(t0(), t0() + Duration::seconds(60));
        session.end = t0() - Duration::seconds(1);
        assert!(session.sanitized().is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let session = Session::break_with(
            t0(),
            t0() + Duration::seconds(300),
            vec!["walk".to_string()],
        );

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["start"], 1_781_078_400_000_i64);
        assert_eq!(json["end"], 1_781_078_700_000_i64);
        assert_eq!(json["duration"], 300);
        assert_eq!(json["type"], "break");
        assert_eq!(json["activities"][0], "walk");
    }

    #[test]
    fn test_reading_omits_activities() {
        let session = Session::reading(t0(), t0() + Duration::seconds(1));
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("activities").is_none());
    }

    #[test]
    fn test_history_line_shapes() {
        let reading = Session::reading(t0(), t0() + Duration::seconds(1830));
        let line = reading.history_line();
        assert!(line.contains(" — "));
        assert!(line.ends_with("(0h 30m 30s)"));

        let empty_break = Session::break_with(t0(), t0() + Duration::seconds(60), Vec::new());
        assert!(empty_break.history_line().starts_with("Break ("));
        assert!(empty_break
            .history_line()
            .ends_with("): No activities selected"));

        let tagged = Session::break_with(
            t0(),
            t0() + Duration::seconds(60),
            vec!["walk".to_string(), "snack".to_string()],
        );
        assert!(tagged.history_line().ends_with("): walk, snack"));
    }

    #[test]
    fn test_normalize_activities() {
        let labels = normalize_activities([" walk", "snack", "", "walk", "  "]);
        assert_eq!(labels, vec!["walk".to_string(), "snack".to_string()]);
    }

    #[test]
    fn test_truncate_to_millis() {
        let precise = t0() + Duration::nanoseconds(1_999_999);
        assert_eq!(truncate_to_millis(precise), t0() + Duration::milliseconds(1));
    }
}
