//! Reading and break time tracking.
//!
//! This module provides:
//! - The reading/break state machine and its persisted record
//! - Daily rollover of the running totals
//! - Import of the browser tracker's local-storage dump

pub mod legacy;
mod machine;
pub mod rollover;
pub mod session;
pub mod state;
pub mod timer;

pub use legacy::import_local_storage;
pub use machine::{
    ConfirmOutcome, DismissOutcome, RolloverReport, StartOutcome, StatusSnapshot, StopOutcome,
    Tracker,
};
pub use rollover::RolloverPolicy;
pub use session::{Session, SessionKind};
pub use state::{RunningTotals, SessionLog, TimerPhase, TrackerState, STATE_KEY};
pub use timer::{format_duration, format_hms, Interval};
