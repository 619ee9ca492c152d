//! XDG-style path utilities for the configuration directory.
//!
//! The global config lives in a single directory; nothing else is
//! persisted by the CLI.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "openrouter-cli";

/// File name of the global configuration document.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the configuration directory for the CLI.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/openrouter-cli` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/openrouter-cli` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Returns the full path of the global configuration document.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
