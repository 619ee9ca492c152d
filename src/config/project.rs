//! Project-local overrides discovered in the working directory.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use super::types::Settings;

/// Candidate override files, highest priority first.
pub const PROJECT_FILES: &[&str] = &[
    ".openrouterrc",
    ".openrouterrc.json",
    ".openrouterrc.yaml",
    ".openrouterrc.yml",
    ".openrouterrc.toml",
];

/// Loads the first project override file found in `dir`.
///
/// Missing candidates are skipped. Any other read or parse error is fatal.
/// Returns empty settings when no candidate exists.
pub fn load_project_override(dir: &Path) -> Result<Settings> {
    for name in PROJECT_FILES {
        let path = dir.join(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read project config: {}", path.display()));
            }
        };

        tracing::debug!(path = %path.display(), "using project config");
        let extension = path.extension().and_then(|ext| ext.to_str());
        return parse_override(&text, extension)
            .with_context(|| format!("Failed to parse project config: {}", path.display()));
    }

    Ok(Settings::default())
}

/// Parses override text according to the file extension.
///
/// `.yaml`/`.yml` parse as YAML and `.toml` as TOML. Anything else parses as
/// JSON; for extensionless files a JSON failure falls back to YAML, then to
/// TOML, and if every format fails the JSON error is reported.
pub fn parse_override(text: &str, extension: Option<&str>) -> Result<Settings> {
    match extension {
        Some("yaml" | "yml") => return Ok(parse_yaml(text)?),
        Some("toml") => return Ok(toml::from_str(text)?),
        _ => {}
    }

    match parse_json(text) {
        Ok(settings) => Ok(settings),
        Err(json_err) if extension.is_none() => parse_yaml(text)
            .ok()
            .or_else(|| toml::from_str(text).ok())
            .ok_or_else(|| anyhow::Error::new(json_err)),
        Err(json_err) => Err(json_err.into()),
    }
}

fn parse_yaml(text: &str) -> serde_yaml::Result<Settings> {
    // an empty document or `~` counts as an empty override
    if text.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str::<Option<Settings>>(text).map(Option::unwrap_or_default)
}

fn parse_json(text: &str) -> serde_json::Result<Settings> {
    // `null` counts as an empty override
    serde_json::from_str::<Option<Settings>>(text).map(Option::unwrap_or_default)
}
