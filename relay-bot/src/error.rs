use crate::config::ConfigError;
use completion_client::{CompletionError, ProfileError};
use thiserror::Error;
use transcript::{TranscriptError, MAX_ARCHIVE_INDEX};

/// Faults while building a session. These abort startup.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot build completion client: {0}")]
    Client(#[from] CompletionError),

    #[error("Cannot build address matcher: {0}")]
    Address(#[from] regex::Error),

    #[error("Cannot read block list: {0}")]
    BlockList(#[source] std::io::Error),

    #[error("Cannot read system prompt: {0}")]
    SystemPrompt(#[source] std::io::Error),
}

/// A directive that could not be carried out. The display text is what the requester is told.
#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid profile name '{0}'. Use letters, digits, '-' or '_'.")]
    InvalidProfileName(String),

    #[error("Failed to load options from '{file}'.")]
    OptionsLoad {
        file: String,
        #[source]
        source: ProfileError,
    },

    #[error("Failed to load profile from '{file}'.")]
    ProfileLoad {
        file: String,
        #[source]
        source: ConfigError,
    },

    #[error("Failed to apply profile from '{file}'.")]
    ProfileApply {
        file: String,
        #[source]
        source: CompletionError,
    },

    #[error("I can't clear my recent memory. It may already be empty.")]
    NothingToClear,

    #[error("I can't clear my recent memory.")]
    Clear(#[source] TranscriptError),

    #[error("Invalid slot '{0}'. Use a number from 1 to {max} or 'auto'.", max = MAX_ARCHIVE_INDEX)]
    InvalidSlot(String),

    #[error("There is no saved conversation in slot {0}.")]
    NoSuchArchive(u32),

    #[error("There are no saved conversations.")]
    NoArchives,

    #[error("All {max} archive slots are in use.", max = MAX_ARCHIVE_INDEX)]
    ArchiveFull,

    #[error("I could not access my memory.")]
    Memory(#[source] TranscriptError),
}

impl From<TranscriptError> for DirectiveError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::InvalidIndex(i) => Self::InvalidSlot(i.to_string()),
            TranscriptError::ArchiveNotFound(i) => Self::NoSuchArchive(i),
            TranscriptError::NoArchives => Self::NoArchives,
            TranscriptError::ArchiveFull => Self::ArchiveFull,
            other => Self::Memory(other),
        }
    }
}
