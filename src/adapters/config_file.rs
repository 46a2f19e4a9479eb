//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document. Missing fields
//! take their defaults (every section is `#[serde(default)]`), so a file
//! only needs the values it overrides. Both load and save validate.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, falling back to defaults when the file does not exist.
    pub fn load_or_default(&self) -> Result<SystemConfig, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound) => {
                info!("No config at {}, using defaults", self.path.display());
                Ok(SystemConfig::default())
            }
            other => other,
        }
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => {
                warn!("Config read failed for {}: {}", self.path.display(), e);
                ConfigError::Io
            }
        })?;

        let config: SystemConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config parse failed for {}: {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;

        info!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("Config write failed for {}: {}", self.path.display(), e);
            ConfigError::Io
        })?;
        info!("Saved config to {}", self.path.display());
        Ok(())
    }
}
