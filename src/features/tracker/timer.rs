//! Duration formatting and the fixed-period schedule used by the live view.

use std::time::{Duration, Instant};

/// Format whole seconds as `Xh Ym Zs`.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h}h {m}m {s}s")
}

/// Format whole seconds as a zero-padded `HH:MM:SS` timer.
#[must_use]
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// A repeating deadline, checked rather than waited on.
///
/// The live view polls terminal events with a timeout and asks each interval
/// whether it has come due.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    last: Instant,
}

impl Interval {
    /// Create an interval whose first deadline is one period after `start`.
    #[must_use]
    pub const fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            last: start,
        }
    }

    /// Returns true, and restarts the period, once a period has elapsed.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Time left until the next deadline.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.period
            .saturating_sub(now.saturating_duration_since(self.last))
    }

    /// The configured period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}
