//! Configuration management for cairn

pub mod schema;

pub use schema::Config;

use crate::error::{CairnError, CairnResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cairn")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if no file exists
    pub fn load(&self) -> CairnResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> CairnResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| CairnError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| CairnError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> CairnResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            CairnError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> CairnResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CairnError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Set a single `section.key` value, preserving file formatting
    pub fn set_value(&self, key: &str, value: &str) -> CairnResult<()> {
        validate_key(key)?;
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| CairnError::ConfigKeyUnknown(key.to_string()))?;

        let content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path).map_err(|e| {
                CairnError::io(format!("reading config from {}", self.config_path.display()), e)
            })?
        } else {
            String::new()
        };

        let mut doc: toml_edit::DocumentMut =
            content.parse().map_err(|e: toml_edit::TomlError| {
                CairnError::ConfigInvalid {
                    path: self.config_path.clone(),
                    reason: e.to_string(),
                }
            })?;

        doc[section][field] = toml_edit::value(parse_toml_scalar(value));

        // Reject edits that produce a schema the loader would not accept
        let updated = doc.to_string();
        toml::from_str::<Config>(&updated).map_err(|e| CairnError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })?;

        self.ensure_config_dir()?;
        fs::write(&self.config_path, updated).map_err(|e| {
            CairnError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Set {} = {}", key, value);
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate that a config key is one we recognise.
fn validate_key(key: &str) -> CairnResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["cache", "base_path"]
        | ["download", "timeout_secs"]
        | ["mirror", "cdn_suffix" | "origin_suffix"] => Ok(()),
        _ => Err(CairnError::ConfigKeyUnknown(key.to_string())),
    }
}

/// Interpret a CLI-supplied value as the closest TOML scalar
fn parse_toml_scalar(value: &str) -> toml_edit::Value {
    if let Ok(n) = value.parse::<i64>() {
        return n.into();
    }
    if let Ok(b) = value.parse::<bool>() {
        return b.into();
    }
    value.into()
}
