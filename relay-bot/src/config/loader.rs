//! Where configuration files live and how profile names map to file names.

use super::schema::ConfigError;
use completion_client::GenerationParams;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_OPTIONS_FILE: &str = "options.json";
pub const BLOCKLIST_FILE: &str = "blocklist.txt";
pub const SYSTEM_PROMPT_FILE: &str = "systemprompt.txt";
pub const CONFIG_DIR_ENV: &str = "RELAY_CONFIG_DIR";

/// Picks the config directory: explicit path, then `RELAY_CONFIG_DIR`, then `./config` when it
/// exists, else the working directory.
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let default_dir = Path::new("config");
    if default_dir.is_dir() {
        default_dir.to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

/// Profile names are ASCII alphanumerics, `-` and `_` only, so they can never leave the config dir.
pub fn validate_profile_name(name: &str) -> Result<&str, ConfigError> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(ConfigError::InvalidProfileName(name.to_string()))
    }
}

/// `prefix.<name>.json`, e.g. `options.creative.json` or `config.staging.json`.
pub fn profile_file_name(prefix: &str, name: &str) -> Result<String, ConfigError> {
    let name = validate_profile_name(name)?;
    Ok(format!("{}.{}.json", prefix, name))
}

/// Reads `systemprompt.txt` from `config_dir`, trimmed. A missing or blank file means no prompt;
/// any other read failure is returned.
pub async fn load_system_prompt(config_dir: &Path) -> std::io::Result<Option<String>> {
    let path = config_dir.join(SYSTEM_PROMPT_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            let prompt = raw.trim();
            info!(path = %path.display(), chars = prompt.chars().count(), "System prompt loaded");
            Ok((!prompt.is_empty()).then(|| prompt.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No system prompt found");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// The parameter set from `options.json` in `config_dir`, or an empty set when it is absent or
/// unreadable.
pub async fn load_default_params(config_dir: &Path) -> GenerationParams {
    let path = config_dir.join(DEFAULT_OPTIONS_FILE);
    match GenerationParams::load_profile(&path).await {
        Ok(params) => {
            info!(path = %path.display(), set = params.iter_set().count(), "Default options loaded");
            params
        }
        Err(e) => {
            info!(path = %path.display(), error = %e, "No default options loaded");
            GenerationParams::default()
        }
    }
}
