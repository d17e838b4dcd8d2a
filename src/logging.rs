//! Structured logging to a file.
//!
//! The terminal belongs to the UI, so log output goes to a file in the state
//! directory. Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::LoggingError;

const DEFAULT_FILTER: &str = "info";

fn open_log(path: &Path) -> Result<File, LoggingError> {
    let open = || -> std::io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    };
    open().map_err(|source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Install the global subscriber writing to `path`.
pub fn init(path: &Path) -> Result<(), LoggingError> {
    let file = open_log(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_log_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("portfolio.log");
        open_log(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_log_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened as a log file
        let err = open_log(temp.path()).unwrap_err();
        assert!(err.to_string().contains(&temp.path().display().to_string()));
    }
}
