use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STATE_DIR_NAME: &str = ".daily_assistant";
pub const HOME_ENV: &str = "DAYBOOK_HOME";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to resolve home directory; pass --home or set DAYBOOK_HOME to an absolute path")]
    HomeNotFound,
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Optional settings read from `config.toml` inside the state directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaybookConfig {
    /// Upper bound for the outbound GET made by `visualize_code`, in seconds.
    pub fetch_timeout_secs: Option<u64>,
    /// User-Agent sent with fetch requests.
    pub user_agent: Option<String>,
    /// When true (the default), any fetched body containing "error" is
    /// returned as-is instead of being wrapped into the visualization prompt.
    pub legacy_error_sniffing: Option<bool>,
}

impl DaybookConfig {
    /// Zero counts as unset.
    pub fn fetch_timeout(&self) -> Duration {
        let secs = self
            .fetch_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Blank values and values that are not a valid header fall back to the default.
    pub fn user_agent(&self) -> String {
        let Some(value) = self
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return default_user_agent();
        };
        if HeaderValue::from_str(value).is_err() {
            tracing::warn!(user_agent = ?value, "invalid user_agent in config; using default");
            return default_user_agent();
        }
        value.to_string()
    }

    pub fn legacy_error_sniffing(&self) -> bool {
        self.legacy_error_sniffing.unwrap_or(true)
    }
}

pub fn default_user_agent() -> String {
    format!("daybook-mcp/{}", env!("CARGO_PKG_VERSION"))
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    for key in ["HOME", "USERPROFILE"] {
        if let Ok(value) = std::env::var(key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
    }
    None
}

/// Resolve the state directory once at startup.
///
/// Precedence: explicit path (`--home`), then `DAYBOOK_HOME`, then
/// `~/.daily_assistant`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(value) = std::env::var(HOME_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir()
        .map(|home| home.join(STATE_DIR_NAME))
        .ok_or(ConfigError::HomeNotFound)
}

pub fn config_path(state_dir: &Path) -> PathBuf {
    state_dir.join("config.toml")
}

/// Missing or unparseable config yields defaults.
pub fn load_config(state_dir: &Path) -> DaybookConfig {
    let path = config_path(state_dir);
    if !path.is_file() {
        return DaybookConfig::default();
    }
    match read_config(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
            DaybookConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<DaybookConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str::<DaybookConfig>(&text)?)
}

pub fn write_config(state_dir: &Path, config: &DaybookConfig) -> Result<PathBuf, ConfigError> {
    fs::create_dir_all(state_dir)?;
    let path = config_path(state_dir);
    let body = toml::to_string_pretty(config)?;
    fs::write(&path, body)?;
    Ok(path)
}
