//! `config` command: show, patch, reset or import the global document.

use anyhow::{Context, Result, bail};
use inquire::Confirm;
use std::io::IsTerminal;

use crate::cli::args::ConfigArgs;
use crate::config::{ConfigDocument, ConfigStore, Settings};
use crate::status;
use crate::ui::{Style, handle_prompt_cancellation};

pub fn run_config(args: ConfigArgs) -> Result<()> {
    let store = ConfigStore::new()?;
    apply(&store, args)?;
    print_document(&store.read()?)
}

fn apply(store: &ConfigStore, args: ConfigArgs) -> Result<()> {
    if args.reset {
        return reset(store, args.yes);
    }

    if let Some(path) = &args.import {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        store.override_config(&text)?;
        status!("{} Imported {}", Style::success("✓"), Style::value(path));
        return Ok(());
    }

    let patch = Settings {
        domain: args.domain,
        model: args.model,
        api_key: args.api_key,
    };
    if patch.is_empty() {
        return Ok(());
    }

    match args.profile_target.as_deref() {
        Some(name) => {
            store.update_profile(name, &patch)?;
            status!("{} Updated profile {}", Style::success("✓"), Style::value(name));
        }
        None => {
            store.update(&patch)?;
            status!("{} Updated base settings", Style::success("✓"));
        }
    }
    Ok(())
}

fn reset(store: &ConfigStore, yes: bool) -> Result<()> {
    if !yes {
        if !std::io::stdin().is_terminal() {
            bail!("Refusing to reset without confirmation.\n\nPass --yes to skip the prompt.");
        }
        let confirmed = handle_prompt_cancellation(|| {
            Ok(Confirm::new("Delete all saved settings and profiles?")
                .with_default(false)
                .prompt()?)
        })?;
        if !confirmed {
            status!("Nothing changed.");
            return Ok(());
        }
    }

    store.reset()?;
    status!(
        "{} Removed {}",
        Style::success("✓"),
        Style::secondary(store.config_path().display())
    );
    Ok(())
}

/// Prints the document as JSON with every API key masked.
fn print_document(document: &ConfigDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(&document.redacted())
        .context("Failed to serialize configuration")?;
    println!("{json}");
    Ok(())
}
