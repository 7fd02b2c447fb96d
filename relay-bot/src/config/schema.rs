//! Configuration schema. Every field except `server` and `channel` is optional and defaulted.

use completion_client::ApiMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Highest schema version this build understands.
pub const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding `api_key` (so the key can live in `.env` instead of the file).
pub const API_KEY_ENV: &str = "RELAY_API_KEY";

pub const DEFAULT_THINKING_MESSAGE: &str = "I will think about that and be back with you shortly.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Mandatory configuration missing: '{0}' is not set")]
    Missing(&'static str),
    #[error("Unsupported config version {0} (this build supports up to {max})", max = CONFIG_VERSION)]
    UnsupportedVersion(u32),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid profile name '{0}'")]
    InvalidProfileName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub version: u32,
    /// Transport server; consumed by the connector, not by the session.
    pub server: String,
    pub channel: String,
    pub nickname: String,
    pub port: String,
    pub use_ssl: bool,
    pub validate_ssl: bool,
    pub debug: bool,
    /// Directive switch; when false every `!word` is answered with "disabled".
    pub commands: bool,
    pub api_url: String,
    pub api_key: String,
    pub api_mode: ApiMode,
    /// Chunk budget in characters.
    pub message_size: usize,
    /// Seconds between chunks.
    pub delay: u64,
    /// Transcript file, relative to the config directory.
    pub history_file: String,
    pub reminder: Option<String>,
    /// Acknowledgement sent when a query is accepted; empty disables it.
    pub thinking_message: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: String::new(),
            channel: String::new(),
            nickname: "Relay".to_string(),
            port: "6667".to_string(),
            use_ssl: false,
            validate_ssl: false,
            debug: false,
            commands: true,
            api_url: "http://localhost:8080/v1/chat/completions".to_string(),
            api_key: "null".to_string(),
            api_mode: ApiMode::Chat,
            message_size: 400,
            delay: 1,
            history_file: "history.json".to_string(),
            reminder: None,
            thinking_message: DEFAULT_THINKING_MESSAGE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl RelayConfig {
    /// Parses a config file, applies the `RELAY_API_KEY` override, and validates it.
    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }
    }

    /// Checks mandatory fields and value ranges. Call before building a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.server.trim().is_empty() {
            return Err(ConfigError::Missing("server"));
        }
        if self.channel.trim().is_empty() {
            return Err(ConfigError::Missing("channel"));
        }
        if self.nickname.trim().is_empty() {
            return Err(ConfigError::Missing("nickname"));
        }
        if self.message_size == 0 {
            return Err(ConfigError::Invalid("message_size must be greater than 0".into()));
        }
        if self.history_file.trim().is_empty() {
            return Err(ConfigError::Missing("history_file"));
        }
        Ok(())
    }

    pub fn settings(&self, config_dir: &Path) -> SessionSettings {
        SessionSettings {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            api_mode: self.api_mode,
            message_size: self.message_size,
            delay: Duration::from_secs(self.delay),
            history_path: config_dir.join(&self.history_file),
            reminder: self.reminder.clone().filter(|r| !r.trim().is_empty()),
            thinking_message: self.thinking_message.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// The part of the configuration a running session reads on every turn.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub api_url: String,
    pub api_key: String,
    pub api_mode: ApiMode,
    pub message_size: usize,
    pub delay: Duration,
    pub history_path: PathBuf,
    pub reminder: Option<String>,
    pub thinking_message: String,
    pub request_timeout: Option<Duration>,
}
