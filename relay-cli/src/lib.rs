//! # relay-cli
//!
//! Argument parsing, config loading and the console transport for the `relay` binary.

pub mod cli;
pub mod console;

pub use cli::{load_config, open_transcript, Cli, Commands};
pub use console::{forward_lines, ConsoleBot};
