use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{ConfigDocument, Settings};
use crate::fs::{atomic_write_private, ensure_private_dir};
use crate::paths;

/// Validation failures for a full-document override.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supplied text is not a well-formed configuration object.
    #[error("Invalid configuration document: {0}")]
    InvalidDocument(String),
}

/// Loads and persists the global configuration document.
///
/// All reads and writes touch one file below one directory. Updates are
/// read-modify-write without locking; concurrent writers race and the last
/// one wins.
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for `$XDG_CONFIG_HOME/openrouter-cli/config.json`
    /// or `~/.config/openrouter-cli/config.json`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    /// Creates a store backed by an explicit file path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the persisted document, or an empty one if none exists.
    pub fn read(&self) -> Result<ConfigDocument> {
        let contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ConfigDocument::default()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read config file: {}", self.config_path.display())
                });
            }
        };

        serde_json::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Overwrites the base fields that `patch` sets and persists the result.
    pub fn update(&self, patch: &Settings) -> Result<()> {
        let mut doc = self.read()?;
        doc.base = doc.base.overlay(patch);
        self.write(&doc)
    }

    /// Same merge as [`update`](Self::update), scoped to one named profile.
    ///
    /// The base fields are left untouched. A patch is plain [`Settings`],
    /// so it cannot carry a nested profile map.
    pub fn update_profile(&self, name: &str, patch: &Settings) -> Result<()> {
        let mut doc = self.read()?;
        let current = doc.profiles.remove(name).unwrap_or_default();
        doc.profiles.insert(name.to_string(), current.overlay(patch));
        self.write(&doc)
    }

    /// Deletes the persisted document.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_file(&self.config_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!(
                    "Failed to remove config file: {}",
                    self.config_path.display()
                )
            }),
        }
    }

    /// Replaces the whole document with `text`.
    ///
    /// `text` must be a JSON object matching the document shape. On a
    /// validation failure nothing is written and the previous document stays.
    pub fn override_config(&self, text: &str) -> Result<ConfigDocument> {
        let doc = parse_document(text)?;
        self.write(&doc)?;
        Ok(doc)
    }

    fn write(&self, doc: &ConfigDocument) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            ensure_private_dir(parent)?;
        }

        let contents = serde_json::to_string_pretty(doc).context("Failed to serialize config")?;
        atomic_write_private(&self.config_path, &contents)
    }
}

fn parse_document(text: &str) -> Result<ConfigDocument, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidDocument(e.to_string()))?;

    if !value.is_object() {
        return Err(ConfigError::InvalidDocument(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ConfigError::InvalidDocument(e.to_string()))
}
