//! User configuration for the Formwork CLI/TUI.
//!
//! Settings resolve in three layers, later layers winning:
//!
//! 1. the JSON config file (`~/.config/formwork/config.json` on most
//!    platforms, or the path in `FORMWORK_CONFIG_PATH`)
//! 2. environment variables (`FORMWORK_API_BASE`, `FORMWORK_LAYOUT_MODE`)
//! 3. command-line flags, applied by the binary on top of [`Settings`]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs_next::{config_dir, data_dir};
use formwork_types::LayoutStage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "FORMWORK_CONFIG_PATH";
pub const API_BASE_ENV: &str = "FORMWORK_API_BASE";
pub const LAYOUT_MODE_ENV: &str = "FORMWORK_LAYOUT_MODE";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub layout_mode: Option<LayoutStage>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub layout_stage: LayoutStage,
    pub request_timeout: Duration,
    /// File the settings were read from, when one existed
    pub source_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            layout_stage: LayoutStage::Published,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            source_path: None,
        }
    }
}

impl Settings {
    /// Load from the default config path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from `path` (a missing file means defaults), then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = read_config_file(path)?;
        let mut settings = Self::default();
        if let Some(file) = file {
            settings.apply_file(file);
            settings.source_path = Some(path.to_path_buf());
        }
        settings.apply_env();
        Ok(settings)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(api_base) = file.api_base.filter(|base| !base.trim().is_empty()) {
            self.api_base = api_base.trim().to_string();
        }
        if let Some(stage) = file.layout_mode {
            self.layout_stage = stage;
        }
        if let Some(secs) = file.request_timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout = Duration::from_secs(secs);
        }
    }

    fn apply_env(&mut self) {
        if let Ok(api_base) = env::var(API_BASE_ENV)
            && !api_base.trim().is_empty()
        {
            self.api_base = api_base.trim().to_string();
        }
        if let Ok(raw) = env::var(LAYOUT_MODE_ENV) {
            match raw.parse::<LayoutStage>() {
                Ok(stage) => self.layout_stage = stage,
                Err(error) => warn!(value = %raw, %error, "ignoring {}", LAYOUT_MODE_ENV),
            }
        }
    }
}

/// Resolved config file path.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formwork")
        .join(CONFIG_FILE_NAME)
}

/// Where the TUI writes its log file.
pub fn default_log_path() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formwork")
        .join("formwork.log")
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => serde_json::from_str(&data).map(Some).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(ConfigError::Io(error)),
    }
}
