//! Tracing subscriber initialization.
//!
//! [`TracingBackend`](crate::backend::TracingBackend) turns console calls into
//! `tracing` events under the `console` target; this module decides where
//! those events (and the crate's own diagnostics) are written.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the filter directives, checked before
/// `RUST_LOG`.
pub const FILTER_ENV: &str = "HCON_LOG";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file, creating its directory if needed.
    File(PathBuf),
    /// Write to standard error.
    Stderr,
}

impl LogTarget {
    /// `-` means standard error; anything else is a file path.
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            LogTarget::Stderr
        } else {
            LogTarget::File(path.to_path_buf())
        }
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber.
///
/// Respects `HCON_LOG`, then `RUST_LOG`, defaulting to `info`.
///
/// # Errors
///
/// Fails if the log directory cannot be created, the path has no file
/// name, or a subscriber is already installed.
pub fn init(target: &LogTarget) -> Result<(), LoggingError> {
    match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|_| LoggingError::SubscriberAlreadySet),
        LogTarget::File(path) => init_file(path),
    }
}

fn init_file(log_path: &Path) -> Result<(), LoggingError> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn dash_means_stderr() {
        assert_eq!(LogTarget::from_path(Path::new("-")), LogTarget::Stderr);
        assert_eq!(
            LogTarget::from_path(Path::new("/tmp/a.log")),
            LogTarget::File(PathBuf::from("/tmp/a.log"))
        );
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("hcon_test_logs_create");
        let log_file = test_dir.join("test.log");

        let _ = fs::remove_dir_all(&test_dir);

        // May fail if a subscriber is already set, which is fine
        let _ = init(&LogTarget::File(log_file));

        assert!(
            test_dir.exists(),
            "Log directory should be created: {:?}",
            test_dir
        );

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_rejects_path_without_file_name() {
        let result = init(&LogTarget::File(PathBuf::from("/")));
        assert!(
            matches!(result, Err(LoggingError::InvalidPath(_))),
            "Root path has no file name, got: {:?}",
            result
        );
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let log_file = std::env::temp_dir().join("hcon_test_logs_twice").join("twice.log");

        let _ = init(&LogTarget::File(log_file.clone()));
        let second = init(&LogTarget::File(log_file));

        assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));
    }
}
