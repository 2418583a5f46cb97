#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Core types for the txtmon file monitor
//!
//! This crate provides the foundational pieces shared by the watcher,
//! the change-detection engine and the CLI:
//!
//! - **Chunks**: fixed-size byte windows of the monitored file
//! - **Fingerprints**: 128-bit content digests used to classify changes
//! - **Configuration**: layered configuration loading
//! - **Error handling**: unified error types

pub mod chunk;
pub mod config;
pub mod error;
pub mod hash;

// Re-export main types for convenience
pub use chunk::{chunk_count, Chunk, ChunkId};
pub use config::{Config, MonitorConfig, WatcherConfig};
pub use error::{Error, Result, ResultExt};
pub use hash::{fingerprint, Fingerprint};

