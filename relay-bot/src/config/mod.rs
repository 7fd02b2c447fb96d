//! Bot configuration: one versioned schema ([`RelayConfig`]) loaded from `config.json`, plus the
//! runtime subset ([`SessionSettings`]) that a `!profile` switch may replace.

mod loader;
mod schema;


pub use loader::{
    load_default_params, load_system_prompt, profile_file_name, resolve_config_dir,
    validate_profile_name, BLOCKLIST_FILE, CONFIG_DIR_ENV, CONFIG_FILE, DEFAULT_OPTIONS_FILE,
    SYSTEM_PROMPT_FILE,
};
pub use schema::{
    ConfigError, RelayConfig, SessionSettings, API_KEY_ENV, CONFIG_VERSION, DEFAULT_THINKING_MESSAGE,
};
