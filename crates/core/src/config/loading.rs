//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `TXTMON_` and use double underscores
    /// for nested values. For example:
    /// - `TXTMON_WATCHER__DEBOUNCE_MS=1000`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // config crate doesn't apply serde defaults for missing sections
        let builder =
            set_config_default(builder, "monitor.chunk_size", default_chunk_size() as i64)?;
        let builder = set_config_default(
            builder,
            "monitor.report_interval_ms",
            default_report_interval_ms() as i64,
        )?;
        let builder =
            set_config_default(builder, "watcher.debounce_ms", default_debounce_ms() as i64)?;
        let builder = set_config_default(
            builder,
            "watcher.max_queue_size",
            default_max_queue_size() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "watcher.poll_interval_ms",
            default_poll_interval_ms() as i64,
        )?;

        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        } else {
            debug!("No config file at {}, using defaults", path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("TXTMON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.txtmon/config.toml or custom --config path)
    /// 3. Environment variables (TXTMON_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
