//! Validation for the paths entered at startup

use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// Extension the monitored file must carry, compared case-insensitively
pub const MONITORED_EXTENSION: &str = "txt";

/// Outcome of preparing the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFileStatus {
    Existing,
    Created,
}

/// Check that `path` names an existing `.txt` file
pub fn validate_monitored_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} does not exist or is not a file", path.display());
    }

    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MONITORED_EXTENSION));
    if !is_txt {
        bail!("{} is not a .txt file", path.display());
    }

    Ok(())
}

/// Create the log file if it does not exist yet
///
/// Existing content is never truncated.
pub fn ensure_log_file(path: &Path) -> Result<LogFileStatus> {
    if path.exists() {
        return Ok(LogFileStatus::Existing);
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    Ok(LogFileStatus::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_existing_txt_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = dir.path().join("notes.TXT");
        std::fs::write(&file, "hello").expect("Failed to write file");

        assert!(validate_monitored_path(&file).is_ok());
    }

    #[test]
    fn test_rejects_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = validate_monitored_path(&dir.path().join("absent.txt"))
            .expect_err("missing file should be rejected");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_rejects_other_extensions() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "hello").expect("Failed to write file");

        let err = validate_monitored_path(&file).expect_err("non-txt should be rejected");
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_rejects_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let sub = dir.path().join("folder.txt");
        std::fs::create_dir(&sub).expect("Failed to create dir");

        assert!(validate_monitored_path(&sub).is_err());
    }

    #[test]
    fn test_log_file_created_once() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let log = dir.path().join("report.log");

        assert_eq!(ensure_log_file(&log).expect("create"), LogFileStatus::Created);
        std::fs::write(&log, "kept").expect("Failed to write log");
        assert_eq!(ensure_log_file(&log).expect("reuse"), LogFileStatus::Existing);
        assert_eq!(std::fs::read_to_string(&log).expect("read"), "kept");
    }

    #[test]
    fn test_log_file_in_missing_directory_fails() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let log = dir.path().join("missing").join("report.log");

        assert!(ensure_log_file(&log).is_err());
    }
}
