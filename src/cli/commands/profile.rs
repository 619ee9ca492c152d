//! `profile` command.

use anyhow::{Context, Result, bail};

use crate::config::{ConfigDocument, ConfigStore};
use crate::status;
use crate::ui::Style;

/// Lists profile names, or prints one profile with its key masked.
pub fn run_profile(name: Option<&str>, active: Option<&str>) -> Result<()> {
    let document = ConfigStore::new()?.read()?;

    match name {
        Some(name) => print_profile(&document, name),
        None => {
            list_profiles(&document, active);
            Ok(())
        }
    }
}

fn list_profiles(document: &ConfigDocument, active: Option<&str>) {
    if document.profiles.is_empty() {
        status!(
            "No profiles configured. Create one with {}",
            Style::value("openrouter config --profile-target <name> ...")
        );
        return;
    }

    for name in document.profiles.keys() {
        if Some(name.as_str()) == active {
            println!("{} {}", Style::value(name), Style::secondary("(active)"));
        } else {
            println!("{name}");
        }
    }
}

fn print_profile(document: &ConfigDocument, name: &str) -> Result<()> {
    let Some(profile) = document.profiles.get(name) else {
        bail!("Unknown profile: {name}");
    };

    let json = serde_json::to_string_pretty(&profile.redacted())
        .context("Failed to serialize profile")?;
    println!("{json}");
    Ok(())
}
