//! Configuration settings for readtime.
//!
//! Settings are loaded from `~/.readtime/config.yaml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::ReadtimeError;
use crate::features::report::ReportPeriod;
use crate::features::tracker::RolloverPolicy;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer and rollover settings.
    pub tracker: TrackerConfig,
    /// Report settings.
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Output format used when `--output` is not given.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Ring the terminal bell on start and stop.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply the setting to `colored`'s global switch.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Timer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    /// When the daily reset may fire.
    #[serde(default)]
    pub rollover: RolloverPolicy,
    /// Labels offered by the break prompt.
    #[serde(default = "default_activities")]
    pub activities: Vec<String>,
    /// Live view refresh interval.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// Live view rollover poll interval.
    #[serde(default = "default_rollover_poll_secs")]
    pub rollover_poll_secs: u64,
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Period used when `--period` is not given.
    #[serde(default)]
    pub default_period: ReportPeriod,
    /// Width of text bar charts.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_true() -> bool {
    true
}

fn default_activities() -> Vec<String> {
    ["walk", "snack", "stretch", "water", "phone", "chat"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_tick_millis() -> u64 {
    1000
}

const fn default_rollover_poll_secs() -> u64 {
    60
}

const fn default_bar_width() -> usize {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
            bell: default_true(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rollover: RolloverPolicy::default(),
            activities: default_activities(),
            tick_millis: default_tick_millis(),
            rollover_poll_secs: default_rollover_poll_secs(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_period: ReportPeriod::default(),
            bar_width: default_bar_width(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, ReadtimeError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReadtimeError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            ReadtimeError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ReadtimeError> {
        let contents = self.to_yaml()?;

        std::fs::write(path, contents).map_err(|e| {
            ReadtimeError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ReadtimeError> {
        serde_yaml::to_string(self)
            .map_err(|e| ReadtimeError::Config(format!("Failed to serialize config: {e}")))
    }
}
