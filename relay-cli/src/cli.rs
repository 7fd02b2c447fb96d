//! CLI parser and config loading.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use completion_client::ApiMode;
use relay_bot::config::load_system_prompt;
use relay_bot::{resolve_config_dir, RelayConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};
use transcript::TranscriptStore;

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Channel relay bot for LLM completion endpoints", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot on the console transport: stdin lines `<sender> <text>`, replies on stdout.
    Run {
        /// Directory holding config.json and friends (default: RELAY_CONFIG_DIR, ./config, or .).
        #[arg(short, long)]
        config_dir: Option<PathBuf>,
        #[arg(long, default_value = "logs/relay.log")]
        log_file: PathBuf,
    },
    /// Send one prompt to the completion endpoint and print the reply.
    Ask {
        #[arg(short, long)]
        config_dir: Option<PathBuf>,
        /// Override the configured api_mode (chat or query).
        #[arg(short, long)]
        mode: Option<ApiMode>,
        #[arg(required = true)]
        prompt: Vec<String>,
    },
}

/// Resolves the config dir and loads `config.json` from it.
pub async fn load_config(config_dir: Option<&Path>) -> Result<(RelayConfig, PathBuf)> {
    let dir = resolve_config_dir(config_dir);
    let path = dir.join(CONFIG_FILE);
    let config = RelayConfig::from_file(&path)
        .await
        .with_context(|| format!("Load configuration from {}", path.display()))?;
    Ok((config, dir))
}

/// Opens the transcript at `history_path`, seeded with the system prompt from `config_dir` the
/// same way the session seeds it.
pub async fn open_transcript(config_dir: &Path, history_path: PathBuf) -> Result<TranscriptStore> {
    let seed = load_system_prompt(config_dir)
        .await
        .with_context(|| format!("Load system prompt from {}", config_dir.display()))?;
    Ok(TranscriptStore::new(history_path, seed))
}
