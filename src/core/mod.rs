//! Core abstractions for readtime.
//!
//! This module provides the clock seam and calendar helpers shared by the
//! tracker, reports and views.

pub mod clock;
mod datetime;

pub use clock::{Clock, SystemClock};
pub use datetime::{day_of, format_clock, local_day_of, parse_past_date, week_start};
