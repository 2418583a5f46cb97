//! Chunked change detection
//!
//! A detection pass re-reads the monitored file in fixed-size windows and
//! upserts one chunk per window. The store is only touched between reads.

use crate::store::{ChunkStore, UpsertOutcome};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, trace};
use txtmon_core::error::{Error, Result};
use txtmon_core::{chunk_count, fingerprint, ChunkId};

/// Counters for one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    /// Windows read (equals the number of valid chunks)
    pub windows: usize,
    pub inserted: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Chunks dropped because the file shrank
    pub pruned: usize,
}

impl DetectionSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Changed => self.changed += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Whether the pass flagged any chunk
    pub fn has_changes(&self) -> bool {
        self.changed > 0
    }
}

/// Reads the monitored file and feeds the chunk store
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    store: Arc<ChunkStore>,
    chunk_size: usize,
}

impl ChangeDetector {
    /// Create a detector writing into `store`
    pub fn new(store: Arc<ChunkStore>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid_input("chunk size must be greater than 0"));
        }
        Ok(Self { store, chunk_size })
    }

    /// Window size in bytes
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Run one detection pass over the file at `path`
    ///
    /// On a read failure the pass stops: windows read before the failure stay
    /// upserted, the partial window is discarded and nothing is pruned.
    pub async fn detect(&self, path: &Path) -> Result<DetectionSummary> {
        let mut file = File::open(path)
            .await
            .map_err(|e| Error::file_access(path, e))?;

        let mut buffer = vec![0u8; self.chunk_size];
        let mut summary = DetectionSummary::default();

        loop {
            let filled = read_window(&mut file, &mut buffer)
                .await
                .map_err(|e| Error::file_access(path, e))?;
            if filled == 0 {
                break;
            }

            self.upsert_window(summary.windows, &buffer[..filled], &mut summary);
            summary.windows += 1;

            if filled < self.chunk_size {
                break;
            }
        }

        summary.pruned = self.store.prune_above(summary.windows);
        debug!(
            "Detection pass over {:?}: {} windows, {} changed, {} new, {} pruned",
            path, summary.windows, summary.changed, summary.inserted, summary.pruned
        );
        Ok(summary)
    }

    /// Seed the store from content read at startup
    pub fn load_initial(&self, content: &[u8]) -> DetectionSummary {
        let mut summary = DetectionSummary::default();
        for window in content.chunks(self.chunk_size) {
            self.upsert_window(summary.windows, window, &mut summary);
            summary.windows += 1;
        }
        summary.pruned = self
            .store
            .prune_above(chunk_count(content.len() as u64, self.chunk_size));
        debug!("Loaded initial content into {} chunks", summary.windows);
        summary
    }

    fn upsert_window(&self, index: usize, window: &[u8], summary: &mut DetectionSummary) {
        let id = ChunkId::new(index);
        let digest = fingerprint(window);
        // Multi-byte characters split at a window edge decode lossily
        let text = String::from_utf8_lossy(window).into_owned();
        let outcome = self.store.upsert(id, digest, text);
        trace!("{} ({} bytes): {:?}", id, window.len(), outcome);
        summary.record(outcome);
    }
}

/// Fill `buffer` unless end-of-file comes first
async fn read_window(file: &mut File, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        let n = file.read(&mut buffer[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
