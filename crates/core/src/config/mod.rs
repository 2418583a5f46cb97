//! Configuration module for txtmon
//!
//! Configuration can be loaded from a TOML file and/or environment variables.
//! Every field has a default, so an absent file yields a usable config.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::DEFAULT_CHUNK_SIZE;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.txtmon/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".txtmon").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Change detection and reporting
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// File watcher configuration
    #[serde(default)]
    pub watcher: WatcherConfig,
}

/// Configuration for change detection and reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Size of each chunk window in bytes
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Interval between report passes in milliseconds
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
}

impl MonitorConfig {
    /// Get the report interval
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            report_interval_ms: default_report_interval_ms(),
        }
    }
}

/// Configuration for file watching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Minimum time between two accepted change notifications
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Capacity of the notification channel
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,

    /// Poll interval used when the platform falls back to polling
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_queue_size: default_max_queue_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.monitor.chunk_size == 0 {
            return Err(Error::config(
                "monitor.chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.monitor.report_interval_ms == 0 {
            return Err(Error::config(
                "monitor.report_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.watcher.max_queue_size == 0 {
            return Err(Error::config(
                "watcher.max_queue_size must be greater than 0".to_string(),
            ));
        }

        if self.watcher.poll_interval_ms == 0 {
            return Err(Error::config(
                "watcher.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
