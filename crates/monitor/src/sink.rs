//! Destinations for rendered reports
//!
//! The log file is the durable destination; a [`ReportSink`] mirrors the
//! same text to an interactive output.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use txtmon_core::error::{Error, Result, ResultExt};

/// Interactive mirror of every rendered report
pub trait ReportSink: Send + Sync {
    /// Write one rendered report
    fn write_report(&self, rendered: &str) -> Result<()>;
}

/// Mirrors reports to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn write_report(&self, rendered: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .context("Failed to write report to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
        Ok(())
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<String>,
    writes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of reports written so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl ReportSink for MemorySink {
    fn write_report(&self, rendered: &str) -> Result<()> {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(rendered);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Append `rendered` to the log file, creating it if absent
///
/// The file is opened for each write and closed afterwards.
pub async fn append_to_log(path: &Path, rendered: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| Error::file_access(path, e))?;
    file.write_all(rendered.as_bytes())
        .await
        .map_err(|e| Error::file_access(path, e))?;
    file.flush().await.map_err(|e| Error::file_access(path, e))?;
    Ok(())
}
