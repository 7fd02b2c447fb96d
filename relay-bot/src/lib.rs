//! # relay-bot
//!
//! Session controller for a channel relay bot: recognizes lines addressed to it, runs directives
//! inline, and forwards queries to a completion endpoint, relaying the answer back in paced chunks.
//!
//! ## Modules
//!
//! - [`config`] – RelayConfig (versioned JSON schema), config dir and profile name resolution
//! - [`blocklist`] – senders that are ignored
//! - [`dispatcher`] – addressing and directive parsing
//! - [`gate`] – AvailabilityGate (single in-flight request)
//! - [`chunker`] – reply chunking and pacing
//! - [`session`] – Session: routing, directives, query turns
//! - [`handlers`] / [`runner`] – handler chain wiring and the inbound loop

pub mod blocklist;
pub mod chunker;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod runner;
pub mod session;

pub use blocklist::BlockList;
pub use chunker::{chunk, send_paced};
pub use config::{resolve_config_dir, ConfigError, RelayConfig, SessionSettings, CONFIG_FILE};
pub use dispatcher::{
    parse_addressed, parse_command, AddressMatcher, Command, Directive, DirectiveKind,
};
pub use error::{DirectiveError, SessionError};
pub use gate::{AvailabilityGate, GateGuard};
pub use handlers::{LoggingHandler, RelayHandler};
pub use runner::{build_handler_chain, run_bot};
pub use session::{Outcome, Session};
