//! relay CLI: run the bot on the console transport, or send a single prompt. Config from
//! `config.json` in the config dir, secrets from `.env`.

use anyhow::{Context, Result};
use clap::Parser;
use completion_client::{ApiMode, CompletionClient};
use relay_bot::config::load_default_params;
use relay_bot::{run_bot, Session};
use relay_cli::{forward_lines, load_config, open_transcript, Cli, Commands, ConsoleBot};
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config_dir,
            log_file,
        } => handle_run(config_dir.as_deref(), &log_file).await,
        Commands::Ask {
            config_dir,
            mode,
            prompt,
        } => handle_ask(config_dir.as_deref(), mode, &prompt.join(" ")).await,
    }
}

/// Loads config, installs tracing, builds the session and pumps stdin into it until EOF.
async fn handle_run(config_dir: Option<&Path>, log_file: &Path) -> Result<()> {
    let (config, dir) = load_config(config_dir).await?;
    let level = if config.debug { "debug" } else { "info" };
    relay_core::init_tracing(log_file, level)?;

    info!(
        server = %config.server,
        port = %config.port,
        use_ssl = config.use_ssl,
        "Starting relay on the console transport"
    );

    let session = Session::new(Arc::new(ConsoleBot), &config, dir)
        .await
        .context("Build session")?;

    let (tx, inbound) = mpsc::channel(64);
    let channel = config.channel.clone();
    tokio::spawn(async move {
        forward_lines(BufReader::new(tokio::io::stdin()), &channel, tx).await;
    });

    run_bot(session, inbound).await;
    Ok(())
}

/// One-shot completion outside the session: same transcript, parameters and endpoint.
async fn handle_ask(config_dir: Option<&Path>, mode: Option<ApiMode>, prompt: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (config, dir) = load_config(config_dir).await?;
    let settings = config.settings(&dir);
    let mode = mode.unwrap_or(settings.api_mode);

    let params = load_default_params(&dir).await;
    let transcript = open_transcript(&dir, settings.history_path.clone()).await?;
    let client = CompletionClient::new(
        settings.api_url.clone(),
        settings.api_key.clone(),
        settings.request_timeout,
    )?;

    match client
        .complete(
            &transcript,
            prompt,
            &params,
            mode,
            settings.reminder.as_deref(),
        )
        .await
    {
        Ok(reply) => {
            println!("{}", reply);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.apology());
            Err(e).context("Completion failed")
        }
    }
}
