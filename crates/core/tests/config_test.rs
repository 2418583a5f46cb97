use txtmon_core::config::{Config, MonitorConfig, WatcherConfig, DEFAULT_CHUNK_SIZE};

#[test]
fn test_monitor_config_defaults() {
    let config = MonitorConfig::default();
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(DEFAULT_CHUNK_SIZE, 10 * 1024 * 1024);
    assert_eq!(config.report_interval_ms, 15000);
}

#[test]
fn test_watcher_config_defaults() {
    let config = WatcherConfig::default();
    assert_eq!(config.debounce_ms, 5000);
    assert!(config.max_queue_size > 0);
}

#[test]
fn test_config_validation_chunk_size() {
    let mut config = Config::default();

    config.monitor.chunk_size = 1;
    assert!(config.validate().is_ok());

    config.monitor.chunk_size = 0;
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("monitor.chunk_size must be greater than 0"));
}

#[test]
fn test_config_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("txtmon.toml");
    std::fs::write(&path, "[monitor]\nreport_interval_ms = 500\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.monitor.report_interval_ms, 500);
    assert!(config.validate().is_ok());
}
