use anyhow::{Context, Result};
use std::path::PathBuf;

use super::project::load_project_override;
use super::store::ConfigStore;
use super::types::{ConfigDocument, ResolvedConfig, Settings};

/// Merges the three layers, lowest precedence first: global base, named
/// profile, project override. Each layer only replaces fields it sets.
///
/// An unknown profile name contributes nothing.
pub fn resolve_layers(
    global: &ConfigDocument,
    profile: Option<&str>,
    project: &Settings,
) -> ResolvedConfig {
    let profile_layer = profile
        .and_then(|name| global.profiles.get(name))
        .cloned()
        .unwrap_or_default();

    global
        .base
        .clone()
        .overlay(&profile_layer)
        .overlay(project)
        .into()
}

/// Resolves the effective configuration from disk on every call.
pub struct ConfigResolver {
    store: ConfigStore,
    project_dir: PathBuf,
}

impl ConfigResolver {
    /// Resolver over the default store and the current working directory.
    pub fn new() -> Result<Self> {
        let project_dir =
            std::env::current_dir().context("Failed to determine current directory")?;
        Ok(Self::with_parts(ConfigStore::new()?, project_dir))
    }

    pub fn with_parts(store: ConfigStore, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            project_dir: project_dir.into(),
        }
    }

    pub const fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn resolve(&self, profile: Option<&str>) -> Result<ResolvedConfig> {
        let global = self.store.read()?;
        let project = load_project_override(&self.project_dir)?;
        Ok(resolve_layers(&global, profile, &project))
    }
}
