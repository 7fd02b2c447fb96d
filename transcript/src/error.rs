//! Transcript error types.

use thiserror::Error;

/// Errors from reading, writing, or archiving a transcript.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Archive index {0} is out of range (1-{max})", max = crate::MAX_ARCHIVE_INDEX)]
    InvalidIndex(u32),
    #[error("No archive with index {0}")]
    ArchiveNotFound(u32),
    #[error("No archives saved yet")]
    NoArchives,
    #[error("All archive slots are in use")]
    ArchiveFull,
}
