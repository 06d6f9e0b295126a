//! Configuration management for readtime.
//!
//! This module handles loading and saving configuration from `~/.readtime/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, GeneralConfig, ReportConfig, TrackerConfig};
