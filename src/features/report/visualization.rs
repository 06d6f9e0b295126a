//! Terminal charts for reports.
//!
//! Provides ASCII bar charts, sparklines and the hour-of-day heatmap.

use super::aggregate::{HourCell, Intensity, SeriesPoint};

/// Characters for sparkline rendering.
const BAR_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart.
///
/// # Arguments
///
/// * `data` - Labelled values
/// * `unit` - Suffix printed after each value
/// * `bar_width` - Width of the bar portion
///
/// # Returns
///
/// A multi-line string with the chart.
#[must_use]
pub fn render_bar_chart(data: &[SeriesPoint], unit: &str, bar_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let label_width = data
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_value = data.iter().map(|p| p.value).max().unwrap_or(1).max(1);
    let mut lines = Vec::new();

    for point in data {
        let value = point.value.max(0);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let bar_length = ((value as f64 / max_value as f64) * bar_width as f64) as usize;
        let bar_length = bar_length.min(bar_width);
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width - bar_length);

        lines.push(format!(
            "{:<label_width$} |{bar}{padding} {value}{unit}",
            point.label
        ));
    }

    lines.join("\n")
}

/// Render a sparkline (compact inline chart).
#[must_use]
pub fn render_sparkline(values: &[i64]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let max_value = values.iter().copied().max().unwrap_or(1).max(1);

    values
        .iter()
        .map(|&v| {
            if v <= 0 {
                BAR_CHARS[0]
            } else {
                #[allow(
                    clippy::cast_precision_loss,
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss
                )]
                let normalized = (v as f64 / max_value as f64 * 7.0) as usize;
                BAR_CHARS[normalized.clamp(1, 7)]
            }
        })
        .collect()
}

const fn intensity_char(intensity: Intensity) -> char {
    match intensity {
        Intensity::None => '·',
        Intensity::Low => '░',
        Intensity::Medium => '▒',
        Intensity::High => '█',
    }
}

/// Render the 24-hour heatmap as a single row with an hour scale.
#[must_use]
pub fn render_heatmap(cells: &[HourCell]) -> String {
    let mut scale = String::new();
    let mut row = String::new();

    for cell in cells {
        if cell.hour % 6 == 0 {
            scale.push_str(&format!("{:<2}", cell.hour));
        } else {
            scale.push_str("  ");
        }
        row.push(intensity_char(cell.intensity));
        row.push(' ');
    }

    let mut lines = vec![scale.trim_end().to_string(), row.trim_end().to_string()];
    lines.push(String::new());
    lines.push("Legend: · = none  ░ = low  ▒ = medium  █ = high".to_string());

    lines.join("\n")
}
