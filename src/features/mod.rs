//! Feature implementations for readtime.
//!
//! This module contains:
//! - Reading/break tracking
//! - Reports

pub mod report;
pub mod tracker;
