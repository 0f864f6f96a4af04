//! Client configuration and persisted preferences

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Preference key holding the UI language
pub const LANGUAGE_KEY: &str = "chikitsak-lang";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed preferences file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the health backend, without trailing slash
    pub api_base: String,
    /// Request timeout. `None` lets a request hang as long as the transport does.
    pub http_timeout: Option<Duration>,
    pub preferences_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: None,
            preferences_path: default_preferences_path(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base = std::env::var("CHIKITSAK_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(
                || DEFAULT_API_BASE.to_string(),
                |v| v.trim_end_matches('/').to_string(),
            );

        let http_timeout = std::env::var("CHIKITSAK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let preferences_path = std::env::var("CHIKITSAK_PREFS_PATH")
            .map_or_else(|_| default_preferences_path(), PathBuf::from);

        Self {
            api_base,
            http_timeout,
            preferences_path,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn default_preferences_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{home}/.chikitsak/preferences.json"))
}

/// Small JSON key-value file standing in for browser local storage
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Preferences {
    /// Load preferences; a missing file yields empty preferences
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Ok(Self { path, values })
    }

    pub fn language(&self) -> &str {
        self.values
            .get(LANGUAGE_KEY)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Update the language and write the file
    pub fn set_language(&mut self, language: &str) -> Result<(), ConfigError> {
        self.values
            .insert(LANGUAGE_KEY.to_string(), Value::String(language.to_string()));
        self.save()
    }

    fn save(&self) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, text).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}
