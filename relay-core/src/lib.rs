//! # relay-core
//!
//! Core types and traits for the relay bot: [`Bot`], [`Handler`], the inbound [`Message`],
//! errors, and tracing initialization. Transport-agnostic; used by handler-chain and relay-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{split_sender_line, Bot};
pub use error::{RelayError, Result};
pub use logger::init_tracing;
pub use types::{Handler, HandlerResponse, Message};
