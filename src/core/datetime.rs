//! Calendar helpers.
//!
//! Session logs are keyed by local calendar date. Lookups go backwards in
//! time, so relative expressions resolve to the past: `monday` means the most
//! recent Monday, `dec 15` the most recent December 15th.

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, Utc, Weekday};

/// Local calendar date of an instant.
#[must_use]
pub fn day_of(instant: DateTime<Local>) -> NaiveDate {
    instant.date_naive()
}

/// Local calendar date of a UTC instant.
#[must_use]
pub fn local_day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// Sunday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// `HH:MM` in local time.
#[must_use]
pub fn format_clock(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}

/// Parse a date for log lookups.
///
/// Supports:
/// - `today`, `yesterday`
/// - `3 days ago`, `2 weeks ago`
/// - `monday`, `mon` (most recent, today included)
/// - `dec 15`, `december 15` (most recent)
/// - `2024-12-15` (ISO format)
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_past_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" => return Some(today),
        "yesterday" => return today.pred_opt(),
        _ => {},
    }

    if let Ok(date) = NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
        return Some(date);
    }

    parse_ago(&input, today)
        .or_else(|| parse_weekday(&input, today))
        .or_else(|| parse_month_day(&input, today))
}

/// Parse "N days/weeks ago".
fn parse_ago(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() != 3 || parts[2] != "ago" {
        return None;
    }

    let amount: i64 = parts[0].parse().ok()?;
    let days = match parts[1].trim_end_matches('s') {
        "day" => amount,
        "week" => amount.checked_mul(7)?,
        _ => return None,
    };

    // Out-of-range amounts do not parse
    today.checked_sub_signed(Duration::try_days(days)?)
}

/// Parse weekday names, resolving to the most recent occurrence.
fn parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let target = match input {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let days_back = (today.weekday().num_days_from_sunday() + 7
        - target.num_days_from_sunday())
        % 7;

    today.checked_sub_days(Days::new(u64::from(days_back)))
}

/// Parse "dec 15" style dates, resolving to the most recent occurrence.
fn parse_month_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() != 2 {
        return None;
    }

    let month = parse_month_name(parts[0])?;
    let day: u32 = parts[1].parse().ok()?;

    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date <= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
    }
}

fn parse_month_name(input: &str) -> Option<u32> {
    match input {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}
