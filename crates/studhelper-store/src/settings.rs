//! # Settings
//!
//! Layered client configuration: built-in defaults, then an optional JSON
//! file in the user config directory, then `STUDHELPER_*` environment
//! variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use studhelper_types::DEFAULT_API_URL;
use thiserror::Error;

/// Errors loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// API root, e.g. `http://localhost:8000/api/v1`.
    pub api_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Where the durable key-value storage lives.
    ///
    /// Defaults to `storage.json` next to the settings file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            storage_path: None,
        }
    }
}

impl Settings {
    /// Returns the settings directory (`<config dir>/studhelper`).
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studhelper"))
    }

    /// Returns the settings file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Loads settings from the default location and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Config`] if a source is malformed.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::config_path();
        if path.is_none() {
            tracing::warn!("Could not determine config directory");
        }
        Self::load_from(path.as_deref())
    }

    /// Loads settings from an explicit file (which may be missing) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Config`] if a source is malformed.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?;

        if let Some(path) = path {
            tracing::debug!(?path, "Reading settings file");
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix("STUDHELPER").try_parsing(true))
            .build()?
            .try_deserialize()?;

        tracing::debug!(api_url = %settings.api_url, "Loaded settings");
        Ok(settings)
    }

    /// Saves settings to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory is unknown or not writable.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Saves settings as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::info!(?path, "Saved settings");
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved path of the durable storage file.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storage.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(&dir.path().join("absent.json"))).unwrap();

        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(settings.storage_path.is_none());
    }

    #[test]
    fn test_saved_file_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studhelper").join("settings.json");

        let settings = Settings {
            api_url: "https://studhelper.example/api/v1".into(),
            timeout_secs: 5,
            storage_path: Some(dir.path().join("kv.json")),
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.timeout_secs, 5);
        assert_eq!(loaded.storage_path(), dir.path().join("kv.json"));
    }

    #[test]
    fn test_storage_path_defaults_next_to_settings() {
        let settings = Settings::default();
        assert!(settings.storage_path().ends_with("storage.json"));
    }
}
