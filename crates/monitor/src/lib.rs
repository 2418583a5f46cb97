#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Chunked change-detection engine
//!
//! This crate tracks which fixed-size regions of a text file changed and
//! turns them into periodic diff reports:
//! - [`ChunkStore`]: concurrent chunk state shared by detection and reporting
//! - [`ChangeDetector`]: windowed re-read of the file, fingerprint comparison
//! - [`ReportGenerator`]: line diff of every flagged chunk, log output
//! - [`Monitor`]: owns the above and schedules detection and report passes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use txtmon_core::Config;
//! use txtmon_monitor::{ConsoleSink, Monitor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let content = std::fs::read("/path/to/notes.txt")?;
//! let monitor = Monitor::initialize(
//!     "/path/to/notes.txt",
//!     "/path/to/report.log",
//!     &content,
//!     Config::default(),
//!     Arc::new(ConsoleSink),
//! )?;
//!
//! monitor.start_watching().await?;
//! let reports = monitor.start_reporting();
//! # reports.await?;
//! # Ok(())
//! # }
//! ```

pub mod detector;
pub mod diff;
pub mod monitor;
pub mod report;
pub mod sink;
pub mod store;

pub use detector::{ChangeDetector, DetectionSummary};
pub use diff::{diff_lines, DiffLine, LineChange};
pub use monitor::Monitor;
pub use report::{Report, ReportEntry, ReportGenerator, ReportOutcome, TIMESTAMP_FORMAT};
pub use sink::{append_to_log, ConsoleSink, MemorySink, ReportSink};
pub use store::{ChangedChunk, ChunkStore, UpsertOutcome};
