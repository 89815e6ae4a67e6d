//! Engine configuration read from `srd.toml`.

use crate::discovery::DirectorySource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where documents live and how failures are surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory scanned for override documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Required ending of a document's file stem.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Forward error-severity diagnostics to the notifier.
    #[serde(default = "default_notify_errors")]
    pub notify_errors: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Data")
}

fn default_suffix() -> String {
    "_SRD".to_string()
}

fn default_notify_errors() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            suffix: default_suffix(),
            notify_errors: default_notify_errors(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads the config at `path`.
    /// Falls back to defaults if the file is missing, unreadable or malformed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}. Falling back to defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Document source for the configured directory and suffix.
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.data_dir, &self.suffix)
    }
}
