#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! File system watching for a single monitored file
//!
//! This crate turns raw notify events into debounced change notifications:
//! - Filtering to modification events on the exact watched path
//! - A debounce gate that accepts at most one notification per window
//! - Non-blocking hand-off from the notify callback
//!
//! # Example
//!
//! ```no_run
//! use txtmon_watcher::{FileWatcher, WatcherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WatcherConfig::default();
//! let mut watcher = FileWatcher::new(config)?;
//!
//! let mut events = watcher.watch("/path/to/notes.txt").await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("File changed: {:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

// Private implementation modules
mod config;
mod debouncer;
mod events;
mod watcher;

// Public exports - minimal API surface
pub use config::{WatcherConfig, WatcherConfigBuilder};
pub use debouncer::{DebounceGate, EventDebouncer};
pub use events::{ChangeKind, FileChange};
pub use watcher::FileWatcher;

