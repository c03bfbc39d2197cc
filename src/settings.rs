//! Game settings
//!
//! Stored as a JSON file next to the game. Missing or broken files fall back
//! to defaults so the game always starts.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Env var holding the JSONBin bin id
pub const ENV_JSONBIN_BIN: &str = "RUN_IT_JSONBIN_BIN";
/// Env var holding the JSONBin master key
pub const ENV_JSONBIN_KEY: &str = "RUN_IT_JSONBIN_KEY";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where scores are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackendKind {
    /// Remote JSONBin bin shared by all players
    JsonBin,
    /// JSON file on this machine
    #[default]
    LocalFile,
    /// No leaderboard at all
    Disabled,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::JsonBin => "jsonbin",
            BackendKind::LocalFile => "local",
            BackendKind::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    pub backend: BackendKind,
    pub jsonbin_bin_id: String,
    pub jsonbin_api_key: String,
    /// Read timeout in seconds; uploads get twice this
    pub timeout_secs: u64,
    /// Record file for the local backend
    pub local_path: PathBuf,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::LocalFile,
            jsonbin_bin_id: String::new(),
            jsonbin_api_key: String::new(),
            timeout_secs: 5,
            local_path: PathBuf::from("data/leaderboard.json"),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Known player name; skips name entry after the first crash
    pub player_name: Option<String>,
    pub leaderboard: LeaderboardSettings,
}

impl Settings {
    /// Default settings file
    pub const DEFAULT_PATH: &'static str = "run-it.json";

    /// Load settings, falling back to defaults if the file is missing or
    /// unreadable
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Strict read
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Apply JSONBin credentials from the environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply JSONBin credentials from `lookup`. Supplying both the bin id and
    /// the key switches the backend to JSONBin.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let bin = lookup(ENV_JSONBIN_BIN).filter(|v| !v.is_empty());
        let key = lookup(ENV_JSONBIN_KEY).filter(|v| !v.is_empty());
        let both = bin.is_some() && key.is_some();

        if let Some(bin) = bin {
            self.leaderboard.jsonbin_bin_id = bin;
        }
        if let Some(key) = key {
            self.leaderboard.jsonbin_api_key = key;
        }
        if both {
            self.leaderboard.backend = BackendKind::JsonBin;
        }
    }
}
