//! Transcript crate: durable, ordered conversation log.
//!
//! ## Modules
//!
//! - [`entry`] – Entry and Role (the on-disk `{role, content}` shape)
//! - [`store`] – TranscriptStore: lazy seeded creation, append, clear, numbered archives
//! - [`error`] – TranscriptError

pub mod entry;
pub mod error;
pub mod store;


pub use entry::{Entry, Role};
pub use error::TranscriptError;
pub use store::{TranscriptStore, AUTO_INDEX, MAX_ARCHIVE_INDEX};
