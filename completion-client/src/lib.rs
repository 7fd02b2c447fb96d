//! # Completion client
//!
//! Talks to an OpenAI-compatible (chat) or llama.cpp-style (query) completion endpoint over HTTP.
//! Owns the request shape: transcript → `messages`, sparse [`GenerationParams`] merged by name,
//! bearer auth, reply extraction, and the chat-mode transcript bookkeeping around each call.

pub mod client;
pub mod error;
pub mod mode;
pub mod params;
pub mod payload;

pub use client::{mask_token, CompletionClient};
pub use error::CompletionError;
pub use mode::ApiMode;
pub use params::{GenerationParams, ProfileError, PARAMETERS};
pub use payload::{chat_payload, parse_chat_reply, parse_query_reply, query_payload};
