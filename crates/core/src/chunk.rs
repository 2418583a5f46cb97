//! Chunk data model
//!
//! A chunk is one fixed-size byte window of the monitored file, identified
//! by its ordinal position. Identifiers are dense and start at 0.

use crate::hash::Fingerprint;
use std::fmt;

/// Ordinal position of a chunk within the monitored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(usize);

impl ChunkId {
    /// Create a chunk identifier from its window index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Window index of this chunk
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {}", self.0)
    }
}

/// Number of chunks covering a file of `file_size` bytes
pub fn chunk_count(file_size: u64, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    file_size.div_ceil(chunk_size as u64) as usize
}

/// Tracked state of a single chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Digest of the chunk's current raw bytes
    pub fingerprint: Fingerprint,
    /// Decoded text of the current bytes
    pub current_content: String,
    /// Decoded text as of the last report that consumed this chunk
    pub previous_content: String,
    /// Set by detection when the fingerprint moves, cleared by reporting
    pub changed: bool,
}

impl Chunk {
    /// Baseline chunk as created by the first detection that reaches it
    pub fn new(fingerprint: Fingerprint, content: String) -> Self {
        Self {
            fingerprint,
            current_content: content,
            previous_content: String::new(),
            changed: false,
        }
    }
}
