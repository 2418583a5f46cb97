//! Concurrent chunk store
//!
//! Detection and reporting mutate the store from different tasks. Every
//! operation on a single chunk goes through one DashMap entry guard, so an
//! upsert is atomic per chunk and a report's visit is paired with its
//! flag-clear.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;
use txtmon_core::{Chunk, ChunkId, Fingerprint};

/// Result of a single [`ChunkStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First time this chunk was seen; stored as baseline
    Inserted,
    /// Fingerprint matched, nothing changed
    Unchanged,
    /// Fingerprint moved, chunk flagged for the next report
    Changed,
}

/// Snapshot of a flagged chunk handed to a report visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedChunk {
    pub id: ChunkId,
    /// Text before the most recent detected change
    pub previous: String,
    /// Text now absorbed as reported
    pub current: String,
}

/// Mapping from chunk identifier to chunk state
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: DashMap<ChunkId, Chunk>,
}

impl ChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new chunk or compare against the stored fingerprint
    pub fn upsert(&self, id: ChunkId, fingerprint: Fingerprint, content: String) -> UpsertOutcome {
        match self.chunks.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(Chunk::new(fingerprint, content));
                UpsertOutcome::Inserted
            }
            Entry::Occupied(mut entry) => {
                let chunk = entry.get_mut();
                if chunk.fingerprint == fingerprint {
                    return UpsertOutcome::Unchanged;
                }

                chunk.previous_content = std::mem::replace(&mut chunk.current_content, content);
                chunk.fingerprint = fingerprint;
                chunk.changed = true;
                trace!("{} flagged as changed ({})", id, fingerprint);
                UpsertOutcome::Changed
            }
        }
    }

    /// Remove every chunk whose index is `>= max_valid_id`
    ///
    /// Returns the number of chunks removed.
    pub fn prune_above(&self, max_valid_id: usize) -> usize {
        let stale: Vec<ChunkId> = self
            .chunks
            .iter()
            .map(|entry| *entry.key())
            .filter(|id| id.index() >= max_valid_id)
            .collect();

        stale
            .into_iter()
            .filter(|id| self.chunks.remove(id).is_some())
            .count()
    }

    /// Consume one flagged chunk, if it is still flagged
    ///
    /// The snapshot and the flag-clear happen under the same entry guard.
    pub fn take_changed(&self, id: ChunkId) -> Option<ChangedChunk> {
        let mut guard = self.chunks.get_mut(&id)?;
        let chunk = &mut *guard;
        if !chunk.changed {
            return None;
        }

        let current = chunk.current_content.clone();
        let previous = std::mem::replace(&mut chunk.previous_content, current.clone());
        chunk.changed = false;

        Some(ChangedChunk {
            id,
            previous,
            current,
        })
    }

    /// Visit every flagged chunk in ascending identifier order
    ///
    /// Each chunk is consumed with [`take_changed`](Self::take_changed) before
    /// the visitor runs, so the visitor holds no lock and may take as long as
    /// it needs. An upsert landing between enumeration and consumption is
    /// absorbed into the reported state. Returns the number of chunks visited.
    pub fn for_each_changed<F>(&self, mut visitor: F) -> usize
    where
        F: FnMut(ChangedChunk),
    {
        let mut visited = 0;
        for id in self.changed_ids() {
            if let Some(changed) = self.take_changed(id) {
                visitor(changed);
                visited += 1;
            }
        }
        visited
    }

    /// Whether at least one chunk is waiting to be reported
    pub fn has_any_changed(&self) -> bool {
        self.chunks.iter().any(|entry| entry.value().changed)
    }

    /// Snapshot of a single chunk
    pub fn get(&self, id: ChunkId) -> Option<Chunk> {
        self.chunks.get(&id).map(|entry| entry.value().clone())
    }

    /// All chunk identifiers, ascending
    pub fn ids(&self) -> Vec<ChunkId> {
        let mut ids: Vec<ChunkId> = self.chunks.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of tracked chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the store tracks no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn changed_ids(&self) -> Vec<ChunkId> {
        let mut ids: Vec<ChunkId> = self
            .chunks
            .iter()
            .filter(|entry| entry.value().changed)
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        ids
    }
}
