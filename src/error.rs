//! Error taxonomy.
//!
//! Only content and terminal errors are fatal. Storage, observation and
//! telemetry failures are absorbed by their owners with a safe default;
//! they have types here so the owners can log them precisely.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Portfolio content could not be loaded or failed validation.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse content file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("phrase list must contain at least one phrase")]
    EmptyPhraseList,

    #[error("phrase {index} is empty")]
    EmptyPhrase { index: usize },
}

/// Durable preference storage failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored preferences are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("persistent storage is unavailable")]
    Unavailable,
}

/// The analytics collector could not record the session start.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("analytics I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode analytics record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no analytics configuration present")]
    NotConfigured,
}

/// The log file could not be opened or the subscriber installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Fatal errors surfaced by the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode portfolio: {0}")]
    Encode(#[from] serde_json::Error),
}
