//! Library interface for the txtmon CLI
//!
//! This module exposes the interactive helpers for testing while keeping
//! the main binary logic in main.rs.

pub mod countdown;
pub mod paths;

pub use countdown::{Countdown, Tick};
pub use paths::{ensure_log_file, validate_monitored_path, LogFileStatus};
