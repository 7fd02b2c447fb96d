//! Tracing initialization: console and log file share the same fmt layer (level, target, span, all fields).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Installs the global tracing subscriber.
///
/// Output is teed to stdout and to `log_file_path` (opened in append mode, parent directories
/// created). The level comes from `RUST_LOG`; when unset, `default_level` is used (e.g. `info`,
/// or `debug` when the bot config asks for it). Load `.env` before calling this so `RUST_LOG`
/// from the file takes effect.
pub fn init_tracing(log_file_path: &Path, default_level: &str) -> anyhow::Result<()> {
    if let Some(parent) = log_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let writer = io::stdout.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_file_and_installs_once() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("logs").join("relay.log");

        init_tracing(&log_file, "info").unwrap();
        tracing::info!(probe = "relay-core", "logger test line");

        let written = std::fs::read_to_string(&log_file).unwrap();
        assert!(written.contains("logger test line"));
        assert!(init_tracing(&log_file, "info").is_err());
    }
}
