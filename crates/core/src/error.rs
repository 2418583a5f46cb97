use std::path::PathBuf;
use thiserror::Error;

/// Result type for txtmon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for txtmon operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure on a specific file (monitored file or report log)
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File watching errors
    #[error("Watcher error: {0}")]
    Watcher(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a file access error for the given path
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a watcher error
    pub fn watcher(msg: impl Into<String>) -> Self {
        Self::Watcher(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error came from reading or writing a file
    pub fn is_io(&self) -> bool {
        matches!(self, Self::FileAccess { .. })
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_access_display_includes_path() {
        let err = Error::file_access(
            "/tmp/watched.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/watched.txt"));
        assert!(message.contains("gone"));
        assert!(err.is_io());
    }

    #[test]
    fn test_context_wraps_source() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Opening log").unwrap_err();
        assert_eq!(err.to_string(), "Opening log: denied");
        assert!(!err.is_io());
    }
}
