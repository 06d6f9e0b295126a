//! readtime - a reading and break time tracker for the terminal
//!
//! This crate tracks reading sessions and the breaks between them, keeps a
//! per-day history in a local `SQLite` store, and renders reports and a live
//! timer view.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::ReadtimeError;
