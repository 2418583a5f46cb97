//! Configuration types for the file watcher
//!
//! This module provides immutable configuration structures for controlling
//! single-file watching and the debounce window.

use std::time::Duration;

/// Immutable configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce window in milliseconds (default: 5000ms)
    pub debounce_ms: u64,
    /// Maximum number of raw notifications in queue (default: 1024)
    pub max_queue_size: usize,
    /// Poll interval for polling-based backends in milliseconds (default: 2000ms)
    pub poll_interval_ms: u64,
}

impl WatcherConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from builder
    pub fn builder() -> WatcherConfigBuilder {
        WatcherConfigBuilder::default()
    }

    /// Get the debounce duration
    pub fn debounce_duration(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Get the poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5000,
            max_queue_size: 1024,
            poll_interval_ms: 2000,
        }
    }
}

impl From<&txtmon_core::WatcherConfig> for WatcherConfig {
    fn from(config: &txtmon_core::WatcherConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            max_queue_size: config.max_queue_size,
            poll_interval_ms: config.poll_interval_ms,
        }
    }
}

/// Builder for WatcherConfig
#[derive(Debug, Default)]
pub struct WatcherConfigBuilder {
    config: WatcherConfig,
}

impl WatcherConfigBuilder {
    /// Set debounce window in milliseconds
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    /// Set maximum queue size
    pub fn max_queue_size(mut self, size: usize) -> Self {
        self.config.max_queue_size = size;
        self
    }

    /// Set poll interval in milliseconds
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms;
        self
    }

    /// Build the configuration
    pub fn build(self) -> WatcherConfig {
        self.config
    }
}

/// Recovery configuration for watcher initialization
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum retry attempts for watcher initialization
    pub max_init_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_init_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}
