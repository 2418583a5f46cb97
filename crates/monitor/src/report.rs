//! Report generation
//!
//! A report pass consumes every flagged chunk, diffs it against the text
//! last reported for it and renders Inserted/Deleted lines as log blocks.
//! The rendered buffer is delivered at most once: it is dropped after the
//! write attempt whether or not the log append succeeded.

use crate::diff::{diff_lines, LineChange};
use crate::sink::{append_to_log, ReportSink};
use crate::store::ChunkStore;
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use txtmon_core::error::Result;
use txtmon_core::ChunkId;

/// Format of the local timestamp written in every record
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One record of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// An inserted or deleted line
    Change {
        timestamp: String,
        chunk: ChunkId,
        kind: LineChange,
        text: String,
    },
    /// Nothing was flagged during this pass
    NoChanges { timestamp: String },
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change {
                timestamp,
                kind,
                text,
                ..
            } => write!(
                f,
                "Timestamp: {timestamp}\nChange Type: {kind}\nChange Value: {text}\n\n"
            ),
            Self::NoChanges { timestamp } => {
                write!(f, "Timestamp: {timestamp} - No changes detected.\n\n")
            }
        }
    }
}

/// Records collected during one report pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Render all records as log text
    pub fn render(&self) -> String {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, wanted: LineChange) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ReportEntry::Change { kind, .. } if *kind == wanted))
            .count()
    }
}

/// What one report pass produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Flagged chunks consumed by this pass
    pub chunks_reported: usize,
    pub inserted: usize,
    pub deleted: usize,
    /// The rendered text that was delivered
    pub rendered: String,
}

impl ReportOutcome {
    /// Whether this pass reported any change
    pub fn has_changes(&self) -> bool {
        self.chunks_reported > 0
    }
}

/// Consumes flagged chunks into a diff report
pub struct ReportGenerator {
    store: Arc<ChunkStore>,
    log_path: PathBuf,
    console: Arc<dyn ReportSink>,
}

impl ReportGenerator {
    pub fn new(store: Arc<ChunkStore>, log_path: PathBuf, console: Arc<dyn ReportSink>) -> Self {
        Self {
            store,
            log_path,
            console,
        }
    }

    /// Path of the report log
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Collect records for every flagged chunk, clearing the flags
    pub fn collect(&self) -> (Report, usize) {
        let mut report = Report::default();

        let visited = self.store.for_each_changed(|changed| {
            let timestamp = timestamp();
            for line in diff_lines(&changed.previous, &changed.current) {
                if line.kind == LineChange::Unchanged {
                    continue;
                }
                report.entries.push(ReportEntry::Change {
                    timestamp: timestamp.clone(),
                    chunk: changed.id,
                    kind: line.kind,
                    text: line.text,
                });
            }
        });

        if visited == 0 {
            report.entries.push(ReportEntry::NoChanges {
                timestamp: timestamp(),
            });
        }

        (report, visited)
    }

    /// Run one report pass
    ///
    /// The rendered report is appended to the log and mirrored to the console.
    /// A failed log append is returned after the console mirror; the report
    /// is not retried.
    pub async fn report(&self) -> Result<ReportOutcome> {
        let (report, visited) = self.collect();
        let rendered = report.render();

        // Flagged chunks whose lines all compare equal render nothing
        let log_result = if rendered.is_empty() {
            Ok(())
        } else {
            let result = append_to_log(&self.log_path, &rendered).await;
            if let Err(e) = self.console.write_report(&rendered) {
                warn!("Failed to mirror report to console: {}", e);
            }
            result
        };

        let outcome = ReportOutcome {
            chunks_reported: visited,
            inserted: report.count(LineChange::Inserted),
            deleted: report.count(LineChange::Deleted),
            rendered,
        };
        debug!(
            "Report pass: {} chunks, {} inserted, {} deleted",
            outcome.chunks_reported, outcome.inserted, outcome.deleted
        );

        log_result.map(|()| outcome)
    }
}
