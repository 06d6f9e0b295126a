//! The persisted tracker record.
//!
//! Everything the tracker knows lives in one versioned JSON record written
//! under [`STATE_KEY`]. Field names are the browser tracker's storage keys,
//! and every field is read leniently: a value may be a native JSON value or
//! the string encoding local storage used (`"true"`, `"1718000000000"`, a
//! JSON-encoded log). Anything that cannot be read becomes its default.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::session::Session;

/// Store key of the record.
pub const STATE_KEY: &str = "readtime_state";

/// Version written into new records.
pub const STATE_VERSION: u32 = 1;

/// Record keys, which double as the browser tracker's local-storage keys.
pub mod keys {
    pub const VERSION: &str = "version";
    pub const IS_READING: &str = "is_reading";
    pub const READING_START_TIME: &str = "reading_start_time";
    pub const LAST_STOP_TIME: &str = "last_stop_time";
    pub const TOTAL_READING_SECONDS: &str = "total_reading_seconds";
    pub const TOTAL_BREAK_SECONDS: &str = "total_break_seconds";
    pub const FIRST_START_TODAY: &str = "first_start_today";
    pub const LAST_RESET_DATE: &str = "last_reset_date";
    pub const READING_SESSIONS: &str = "reading_sessions";
    pub const TODAYS_SESSIONS: &str = "todays_sessions";
    pub const BREAK_ACTIVITIES: &str = "break_activities";

    /// Every key carrying tracker data.
    pub const ALL: [&str; 10] = [
        IS_READING,
        READING_START_TIME,
        LAST_STOP_TIME,
        TOTAL_READING_SECONDS,
        TOTAL_BREAK_SECONDS,
        FIRST_START_TODAY,
        LAST_RESET_DATE,
        READING_SESSIONS,
        TODAYS_SESSIONS,
        BREAK_ACTIVITIES,
    ];
}

/// Where the timer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TimerPhase {
    /// Nothing running and no break waiting.
    Idle,
    /// A reading session is running.
    Reading {
        /// Wall-clock start of the session.
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
    },
    /// Reading stopped; the break awaits confirmation.
    OnBreakPendingConfirmation {
        /// When reading stopped.
        #[serde(with = "chrono::serde::ts_milliseconds")]
        since: DateTime<Utc>,
    },
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Reading { .. } => write!(f, "Reading"),
            Self::OnBreakPendingConfirmation { .. } => write!(f, "On break"),
        }
    }
}

/// Today's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningTotals {
    /// Seconds read today.
    pub reading_seconds: i64,
    /// Seconds of confirmed breaks today.
    pub break_seconds: i64,
}

/// Date-keyed session logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionLog {
    /// Reading sessions per day; analytics history, never cleared by rollover.
    pub reading_sessions: BTreeMap<NaiveDate, Vec<Session>>,
    /// Reading and break sessions per day, shown as the day's history.
    pub todays_sessions: BTreeMap<NaiveDate, Vec<Session>>,
    /// Break seconds per activity label per day.
    pub break_activities: BTreeMap<NaiveDate, BTreeMap<String, i64>>,
}

impl SessionLog {
    /// Record a completed reading session under `date`.
    pub fn record_reading(&mut self, date: NaiveDate, session: Session) {
        self.reading_sessions
            .entry(date)
            .or_default()
            .push(session.clone());
        self.todays_sessions.entry(date).or_default().push(session);
    }

    /// Record a confirmed break under `date`, crediting each activity with
    /// the whole break.
    pub fn record_break(&mut self, date: NaiveDate, session: Session) {
        if !session.activities.is_empty() {
            let totals = self.break_activities.entry(date).or_default();
            for activity in &session.activities {
                *totals.entry(activity.clone()).or_default() += session.duration_seconds;
            }
        }
        self.todays_sessions.entry(date).or_default().push(session);
    }

    /// Drop the history list of `date`, returning how many sessions it held.
    pub fn clear_day(&mut self, date: NaiveDate) -> usize {
        self.todays_sessions.remove(&date).map_or(0, |s| s.len())
    }

    /// The history list of `date`.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> &[Session] {
        self.todays_sessions.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Reading sessions of `date`.
    #[must_use]
    pub fn reading_on(&self, date: NaiveDate) -> &[Session] {
        self.reading_sessions.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Check if nothing was ever recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reading_sessions.is_empty()
            && self.todays_sessions.is_empty()
            && self.break_activities.is_empty()
    }
}

/// The whole persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerState {
    /// Record format version.
    pub version: u32,
    /// Whether a reading session is running.
    pub is_reading: bool,
    /// Start of the running session.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub reading_start_time: Option<DateTime<Utc>>,
    /// When reading last stopped; set while a break awaits confirmation.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_stop_time: Option<DateTime<Utc>>,
    /// Seconds read today.
    pub total_reading_seconds: i64,
    /// Seconds of confirmed breaks today.
    pub total_break_seconds: i64,
    /// Day of the last plain start.
    pub first_start_today: Option<NaiveDate>,
    /// Day of the last rollover.
    pub last_reset_date: Option<NaiveDate>,
    /// Session logs.
    #[serde(flatten)]
    pub log: SessionLog,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            is_reading: false,
            reading_start_time: None,
            last_stop_time: None,
            total_reading_seconds: 0,
            total_break_seconds: 0,
            first_start_today: None,
            last_reset_date: None,
            log: SessionLog::default(),
        }
    }
}

impl TrackerState {
    /// Parse a stored record, falling back to defaults for anything unreadable.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            Ok(other) => {
                warn!(kind = json_kind(&other), "tracker record is not an object, starting fresh");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "tracker record is not valid JSON, starting fresh");
                Self::default()
            }
        }
    }

    /// Build a record from loosely-typed fields.
    #[must_use]
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        if let Some(version) = fields.get(keys::VERSION).and_then(read_int) {
            if version > i64::from(STATE_VERSION) {
                warn!(version, "tracker record is from a newer version, reading known fields");
            }
        }

        let mut state = Self {
            version: STATE_VERSION,
            is_reading: fields.get(keys::IS_READING).is_some_and(read_bool),
            reading_start_time: fields.get(keys::READING_START_TIME).and_then(read_timestamp),
            last_stop_time: fields.get(keys::LAST_STOP_TIME).and_then(read_timestamp),
            total_reading_seconds: fields
                .get(keys::TOTAL_READING_SECONDS)
                .and_then(read_int)
                .unwrap_or(0),
            total_break_seconds: fields
                .get(keys::TOTAL_BREAK_SECONDS)
                .and_then(read_int)
                .unwrap_or(0),
            first_start_today: fields.get(keys::FIRST_START_TODAY).and_then(read_date),
            last_reset_date: fields.get(keys::LAST_RESET_DATE).and_then(read_date),
            log: SessionLog {
                reading_sessions: fields
                    .get(keys::READING_SESSIONS)
                    .map(|v| read_session_log(keys::READING_SESSIONS, v))
                    .unwrap_or_default(),
                todays_sessions: fields
                    .get(keys::TODAYS_SESSIONS)
                    .map(|v| read_session_log(keys::TODAYS_SESSIONS, v))
                    .unwrap_or_default(),
                break_activities: fields
                    .get(keys::BREAK_ACTIVITIES)
                    .map(read_break_log)
                    .unwrap_or_default(),
            },
        };

        state.normalize();
        state
    }

    /// Repair combinations the state machine never produces.
    pub fn normalize(&mut self) {
        if self.is_reading && self.reading_start_time.is_none() {
            warn!("record says reading but has no start time, treating as stopped");
            self.is_reading = false;
        }
        if !self.is_reading && self.reading_start_time.is_some() {
            warn!("record has a start time but is not reading, dropping it");
            self.reading_start_time = None;
        }
        if self.total_reading_seconds < 0 || self.total_break_seconds < 0 {
            warn!("negative totals in record, clamping to zero");
            self.total_reading_seconds = self.total_reading_seconds.max(0);
            self.total_break_seconds = self.total_break_seconds.max(0);
        }
        self.version = STATE_VERSION;
    }

    /// Current phase of the timer.
    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        match (self.is_reading, self.reading_start_time, self.last_stop_time) {
            (true, Some(since), _) => TimerPhase::Reading { since },
            (_, _, Some(since)) => TimerPhase::OnBreakPendingConfirmation { since },
            _ => TimerPhase::Idle,
        }
    }

    /// Today's counters.
    #[must_use]
    pub const fn totals(&self) -> RunningTotals {
        RunningTotals {
            reading_seconds: self.total_reading_seconds,
            break_seconds: self.total_break_seconds,
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim() == "true",
        _ => false,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn read_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn read_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    read_int(value).and_then(DateTime::from_timestamp_millis)
}

fn read_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Local storage kept composite values JSON-encoded inside strings.
fn decode_nested(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok(),
        Value::Null => None,
        other => Some(other.clone()),
    }
}

fn date_entries<'a>(
    name: &'static str,
    object: &'a Map<String, Value>,
) -> impl Iterator<Item = (NaiveDate, &'a Value)> + 'a {
    object.iter().filter_map(move |(key, value)| {
        match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => Some((date, value)),
            Err(_) => {
                warn!(log = name, key = %key, "skipping log entry with a malformed date");
                None
            }
        }
    })
}

fn read_session_log(name: &'static str, value: &Value) -> BTreeMap<NaiveDate, Vec<Session>> {
    let Some(Value::Object(days)) = decode_nested(value) else {
        warn!(log = name, "session log is not an object, ignoring it");
        return BTreeMap::new();
    };

    let mut log = BTreeMap::new();

    for (date, entries) in date_entries(name, &days) {
        let Some(entries) = entries.as_array() else {
            warn!(log = name, %date, "day entry is not a list, ignoring it");
            continue;
        };

        let sessions: Vec<Session> = entries
            .iter()
            .filter_map(|entry| {
                let parsed = serde_json::from_value::<Session>(entry.clone())
                    .ok()
                    .and_then(Session::sanitized);
                if parsed.is_none() {
                    warn!(log = name, %date, "skipping malformed session");
                }
                parsed
            })
            .collect();

        if !sessions.is_empty() {
            log.insert(date, sessions);
        }
    }

    log
}

fn read_break_log(value: &Value) -> BTreeMap<NaiveDate, BTreeMap<String, i64>> {
    let name = keys::BREAK_ACTIVITIES;
    let Some(Value::Object(days)) = decode_nested(value) else {
        warn!(log = name, "break log is not an object, ignoring it");
        return BTreeMap::new();
    };

    let mut log = BTreeMap::new();

    for (date, activities) in date_entries(name, &days) {
        let Some(activities) = activities.as_object() else {
            warn!(log = name, %date, "day entry is not an object, ignoring it");
            continue;
        };

        let totals: BTreeMap<String, i64> = activities
            .iter()
            .filter_map(|(label, seconds)| {
                read_int(seconds)
                    .filter(|s| *s >= 0)
                    .map(|s| (label.clone(), s))
            })
            .collect();

        if !totals.is_empty() {
            log.insert(date, totals);
        }
    }

    log
}
