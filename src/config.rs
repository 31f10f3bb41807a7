use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::Keybindings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Key sequence -> command line; an empty command line unbinds the key.
    #[serde(default)]
    pub keybindings: HashMap<String, String>,
    /// Extra keys that start multi-key sequences, on top of `g`.
    #[serde(default)]
    pub modifier_keys: Vec<String>,
    /// Default tracing filter when `RUST_LOG` is unset, e.g. `"debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    InvalidJson(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            ConfigError::InvalidJson(msg) => write!(f, "Invalid JSON in config: {}", msg),
            ConfigError::IoError(e) => write!(f, "IO error reading config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("berth.json"))
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson(e.to_string()))
}

/// Loads `explicit` if given (it must exist), otherwise the default path,
/// falling back to defaults when that file is absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    match config_path() {
        Some(path) => match load_config_from(&path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        },
        None => Ok(Config::default()),
    }
}

impl Config {
    /// Default bindings with this config's overrides applied.
    pub fn keybindings(&self) -> Keybindings {
        Keybindings::with_overrides(&self.keybindings, &self.modifier_keys)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidJson(e.to_string()))?;

        fs::write(path, content)?;
        Ok(())
    }
}
