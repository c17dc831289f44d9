//! Data store errors

use crate::feed::FeedError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing the trade tape
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store file does not exist
    #[error("No trade file at {0}")]
    NotFound(PathBuf),
    /// Creating or opening the store failed
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Appending to the store failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the store failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// First line is not the expected header
    #[error("Unexpected header in {path}: {found:?}")]
    InvalidHeader { path: PathBuf, found: String },
}

/// A stored row that could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid row: {0}")]
pub struct RowError(pub String);

/// Errors handling one inbound event
#[derive(Debug, Error)]
pub enum RecordError {
    /// Event dropped; ingestion continues
    #[error(transparent)]
    Feed(#[from] FeedError),
    /// Store write failed; ingestion must stop
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecordError {
    /// Whether the session has to end
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecordError::Store(_))
    }
}
