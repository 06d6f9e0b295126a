//! Series computed from the session logs.
//!
//! Every function looks backwards from `today`, a local calendar date.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::ReportPeriod;
use crate::core::week_start;
use crate::features::tracker::{Session, SessionLog};

/// One labelled value of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// `Mon` for days, `Week 6/7` for weeks.
    pub label: String,
    /// Minutes or score.
    pub value: i64,
}

impl SeriesPoint {
    fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// How busy an hour of the day is relative to the busiest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
}

impl Intensity {
    /// Classify `minutes` against the busiest hour.
    #[must_use]
    pub fn classify(minutes: f64, max: f64) -> Self {
        if max <= 0.0 || minutes <= 0.0 {
            return Self::None;
        }
        let ratio = minutes / max;
        if ratio > 0.7 {
            Self::High
        } else if ratio > 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Reading minutes started in one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourCell {
    /// Local hour, 0-23.
    pub hour: u32,
    /// Minutes of reading sessions started in this hour.
    pub minutes: f64,
    /// Relative intensity.
    pub intensity: Intensity,
}

/// `round(x)` on non-negative minute values.
#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}

fn day_minutes(sessions: &[Session]) -> f64 {
    sessions.iter().map(Session::minutes).sum()
}

#[allow(clippy::cast_precision_loss)]
fn day_score(sessions: &[Session]) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }
    sessions.len() as f64 * 10.0 + day_minutes(sessions) / 10.0
}

/// The last `days` days, oldest first.
fn last_days(today: NaiveDate, days: i64) -> impl Iterator<Item = NaiveDate> {
    (0..days).rev().map(move |i| today - Duration::days(i))
}

fn week_label(start: NaiveDate) -> String {
    format!("Week {}/{}", start.month(), start.day())
}

/// Reading minutes per day (week) or per Sunday-start week (month).
#[must_use]
pub fn reading_series(log: &SessionLog, today: NaiveDate, period: ReportPeriod) -> Vec<SeriesPoint> {
    match period {
        ReportPeriod::Week => last_days(today, 7)
            .map(|date| {
                let seconds: i64 = log.reading_on(date).iter().map(|s| s.duration_seconds).sum();
                #[allow(clippy::cast_precision_loss)]
                let minutes = seconds as f64 / 60.0;
                SeriesPoint::new(date.format("%a").to_string(), round(minutes))
            })
            .collect(),
        ReportPeriod::Month => {
            let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for date in last_days(today, 30) {
                *weeks.entry(week_start(date)).or_default() += day_minutes(log.reading_on(date));
            }
            weeks
                .into_iter()
                .map(|(start, minutes)| SeriesPoint::new(week_label(start), round(minutes)))
                .collect()
        }
    }
}

/// Break minutes per activity label over the period, sorted by label.
#[must_use]
pub fn break_breakdown(
    log: &SessionLog,
    today: NaiveDate,
    period: ReportPeriod,
) -> BTreeMap<String, i64> {
    let mut seconds: BTreeMap<String, i64> = BTreeMap::new();

    for date in last_days(today, period.days()) {
        if let Some(activities) = log.break_activities.get(&date) {
            for (label, secs) in activities {
                *seconds.entry(label.clone()).or_default() += secs;
            }
        }
    }

    seconds
        .into_iter()
        .map(|(label, secs)| {
            #[allow(clippy::cast_precision_loss)]
            let minutes = secs as f64 / 60.0;
            (label, round(minutes))
        })
        .collect()
}

/// Activity score per day (week) or over the last four Sunday-start weeks (month).
///
/// A day scores ten per session plus a tenth of its reading minutes.
#[must_use]
pub fn activity_pattern(log: &SessionLog, today: NaiveDate, period: ReportPeriod) -> Vec<SeriesPoint> {
    match period {
        ReportPeriod::Week => last_days(today, 7)
            .map(|date| {
                SeriesPoint::new(date.format("%a").to_string(), round(day_score(log.reading_on(date))))
            })
            .collect(),
        ReportPeriod::Month => {
            let this_week = week_start(today);
            (0..4)
                .rev()
                .map(|i| {
                    let start = this_week - Duration::days(i * 7);
                    let score: f64 = (0..7)
                        .map(|d| day_score(log.reading_on(start + Duration::days(d))))
                        .sum();
                    SeriesPoint::new(week_label(start), round(score))
                })
                .collect()
        }
    }
}

/// Reading minutes by local start hour over all recorded sessions.
#[must_use]
pub fn hourly_heatmap(log: &SessionLog) -> Vec<HourCell> {
    let mut minutes = [0.0_f64; 24];

    for session in log.reading_sessions.values().flatten() {
        // Hours are always 0-23
        if let Some(slot) = minutes.get_mut(session.start_hour() as usize) {
            *slot += session.minutes();
        }
    }

    let max = minutes.iter().copied().fold(0.0_f64, f64::max);

    (0_u32..)
        .zip(minutes)
        .map(|(hour, minutes)| HourCell {
            hour,
            minutes,
            intensity: Intensity::classify(minutes, max),
        })
        .collect()
}
