//! Integration tests for logging functionality
//!
//! A global subscriber can only be installed once per process, so everything
//! that initializes logging lives in a single test.

use agenda::config::LoggingConfig;
use agenda::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_file_logging_writes_rolling_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    assert!(guard.has_file_output());
    assert!(log_path.is_dir());

    tracing::info!(date = "2025-03-14", "Schedule loaded");
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("agenda.log"))
        .collect();
    assert_eq!(files.len(), 1);

    // The global subscriber is already set
    let second = init_logging("info", &LoggingConfig::default());
    assert!(second.is_err());
}
