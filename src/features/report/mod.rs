//! Reading reports.
//!
//! Charts computed from the session logs: reading minutes, break activity
//! breakdown, activity pattern and the hour-of-day heatmap.

mod aggregate;
mod visualization;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use aggregate::{
    activity_pattern, break_breakdown, hourly_heatmap, reading_series, HourCell, Intensity,
    SeriesPoint,
};
pub use visualization::{render_bar_chart, render_heatmap, render_sparkline};

use crate::error::ReadtimeError;
use crate::features::tracker::SessionLog;

/// Report time period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Last 7 days
    #[default]
    Week,
    /// Last 30 days
    Month,
}

impl ReportPeriod {
    /// Number of days covered.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Week => "This Week",
            Self::Month => "This Month",
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = ReadtimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" | "w" | "weekly" | "7d" => Ok(Self::Week),
            "month" | "m" | "monthly" | "30d" => Ok(Self::Month),
            other => Err(ReadtimeError::InvalidInput(format!(
                "Invalid period: {other}. Use 'week' or 'month'"
            ))),
        }
    }
}

/// Which charts a report includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportView {
    /// Every chart.
    #[default]
    All,
    /// Reading minutes.
    Reading,
    /// Break activity breakdown.
    Breaks,
    /// Activity pattern.
    Pattern,
    /// Hour-of-day heatmap.
    Heatmap,
}

impl ReportView {
    fn includes(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

/// Report data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Period covered.
    pub period: ReportPeriod,
    /// Last day covered.
    pub today: NaiveDate,
    /// Reading minutes per day or week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<Vec<SeriesPoint>>,
    /// Break minutes per activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaks: Option<BTreeMap<String, i64>>,
    /// Activity score per day or week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Vec<SeriesPoint>>,
    /// Reading minutes per start hour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Vec<HourCell>>,
}

impl Report {
    /// Generate a report from the logs.
    #[must_use]
    pub fn generate(log: &SessionLog, today: NaiveDate, period: ReportPeriod, view: ReportView) -> Self {
        Self {
            period,
            today,
            reading: view
                .includes(ReportView::Reading)
                .then(|| reading_series(log, today, period)),
            breaks: view
                .includes(ReportView::Breaks)
                .then(|| break_breakdown(log, today, period)),
            pattern: view
                .includes(ReportView::Pattern)
                .then(|| activity_pattern(log, today, period)),
            heatmap: view
                .includes(ReportView::Heatmap)
                .then(|| hourly_heatmap(log)),
        }
    }

    /// Total reading minutes in the reading series.
    #[must_use]
    pub fn total_reading_minutes(&self) -> i64 {
        self.reading
            .as_ref()
            .map_or(0, |series| series.iter().map(|p| p.value).sum())
    }

    /// Format the report for display.
    #[must_use]
    pub fn format(&self, bar_width: usize) -> String {
        let mut lines = Vec::new();

        lines.push(format!("📖 Reading Report: {}", self.period.display_name()));
        lines.push("═".repeat(50));
        lines.push(String::new());

        if let Some(reading) = &self.reading {
            lines.push("Reading Time".to_string());
            lines.push("─".repeat(40));
            lines.push(render_bar_chart(reading, "m", bar_width));
            let values: Vec<i64> = reading.iter().map(|p| p.value).collect();
            lines.push(format!(
                "  Total: {}m  {}",
                self.total_reading_minutes(),
                render_sparkline(&values)
            ));
            lines.push(String::new());
        }

        if let Some(breaks) = &self.breaks {
            lines.push("Break Activities".to_string());
            lines.push("─".repeat(40));
            if breaks.is_empty() {
                lines.push("  No breaks recorded".to_string());
            } else {
                let points: Vec<SeriesPoint> = breaks
                    .iter()
                    .map(|(label, minutes)| SeriesPoint {
                        label: label.clone(),
                        value: *minutes,
                    })
                    .collect();
                lines.push(render_bar_chart(&points, "m", bar_width));
            }
            lines.push(String::new());
        }

        if let Some(pattern) = &self.pattern {
            lines.push("Activity Pattern".to_string());
            lines.push("─".repeat(40));
            lines.push(render_bar_chart(pattern, "", bar_width));
            lines.push(String::new());
        }

        if let Some(heatmap) = &self.heatmap {
            lines.push("Reading by Hour".to_string());
            lines.push("─".repeat(40));
            lines.push(render_heatmap(heatmap));
        }

        lines.join("\n").trim_end().to_string()
    }
}
