//! `init` command: interactive first-run setup.

use anyhow::Result;
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use std::fmt;

use crate::api::ChatClient;
use crate::auth::api_key_from_env;
use crate::config::{ConfigStore, DEFAULT_DOMAIN, DEFAULT_MODEL, Settings};
use crate::ui::{Style, handle_prompt_cancellation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    OpenRouter,
    OpenAi,
    Custom,
}

impl Provider {
    const ALL: [Self; 3] = [Self::OpenRouter, Self::OpenAi, Self::Custom];

    /// Suggested (domain, model) for the provider.
    const fn preset(self) -> (&'static str, &'static str) {
        match self {
            Self::OpenRouter => (DEFAULT_DOMAIN, DEFAULT_MODEL),
            Self::OpenAi => ("https://api.openai.com/v1", "gpt-4o-mini"),
            Self::Custom => ("", ""),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenRouter => "openrouter",
            Self::OpenAi => "openai",
            Self::Custom => "custom",
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Answers {
    domain: String,
    model: String,
    api_key: Option<String>,
    profile: Option<String>,
}

impl Answers {
    fn settings(&self) -> Settings {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Settings {
            domain: non_empty(&self.domain),
            model: non_empty(&self.model),
            api_key: self.api_key.clone(),
        }
    }
}

/// Runs the wizard and saves to `store`. Returns whether anything was saved.
///
/// Cancelling any prompt saves nothing.
pub async fn run_init(store: &ConfigStore) -> Result<bool> {
    println!("{}", Style::header("OpenRouter CLI setup"));
    println!();

    let Some(answers) = handle_prompt_cancellation(|| prompt_answers().map(Some))? else {
        return Ok(false);
    };

    let mut save = true;
    if let Some(api_key) = answers.api_key.as_deref().filter(|_| !answers.domain.is_empty()) {
        match check_connection(&answers.domain, api_key).await {
            Ok(()) => println!("{} Connection OK", Style::success("✓")),
            Err(err) => {
                println!("{} Connection failed: {err:#}", Style::warning("!"));
                save = handle_prompt_cancellation(|| {
                    Ok(Confirm::new("Save settings anyway?")
                        .with_default(false)
                        .prompt()?)
                })?;
            }
        }
    }

    if !save {
        println!("Nothing saved.");
        return Ok(false);
    }

    let settings = answers.settings();
    match answers.profile.as_deref() {
        Some(name) => {
            store.update_profile(name, &settings)?;
            println!(
                "{} Saved to profile {} in {}",
                Style::success("✓"),
                Style::value(name),
                Style::secondary(store.config_path().display())
            );
        }
        None => {
            store.update(&settings)?;
            println!(
                "{} Saved to base settings in {}",
                Style::success("✓"),
                Style::secondary(store.config_path().display())
            );
        }
    }
    Ok(true)
}

async fn check_connection(domain: &str, api_key: &str) -> Result<()> {
    ChatClient::new(domain, api_key)?.test_connection().await?;
    Ok(())
}

fn prompt_answers() -> Result<Answers> {
    let provider = Select::new("Provider:", Provider::ALL.to_vec()).prompt()?;
    let (preset_domain, preset_model) = provider.preset();

    let domain = with_default(Text::new("API domain:"), preset_domain)
        .prompt()?
        .trim()
        .to_string();
    let model = with_default(Text::new("Default model:"), preset_model)
        .prompt()?
        .trim()
        .to_string();

    let api_key = match api_key_from_env() {
        Some(key) => {
            println!("{}", Style::hint("Using the API key from the environment."));
            Some(key)
        }
        None => Some(
            Password::new("API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .with_help_message("Leave blank to skip")
                .prompt()?
                .trim()
                .to_string(),
        )
        .filter(|key| !key.is_empty()),
    };

    let profile = Text::new("Profile name:")
        .with_help_message("Optional; leave blank to save to the base settings")
        .prompt()?
        .trim()
        .to_string();

    Ok(Answers {
        domain,
        model,
        api_key,
        profile: (!profile.is_empty()).then_some(profile),
    })
}

fn with_default<'a>(prompt: Text<'a, 'a>, default: &'a str) -> Text<'a, 'a> {
    if default.is_empty() {
        prompt
    } else {
        prompt.with_default(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Provider::OpenRouter.preset(), (DEFAULT_DOMAIN, DEFAULT_MODEL));
        assert_eq!(Provider::OpenAi.preset().0, "https://api.openai.com/v1");
        assert_eq!(Provider::Custom.preset(), ("", ""));
        assert_eq!(Provider::OpenAi.to_string(), "openai");
    }

    #[test]
    fn test_blank_answers_are_not_saved_as_values() {
        let answers = Answers {
            domain: "https://example.com/v1".to_string(),
            ..Answers::default()
        };

        let settings = answers.settings();
        assert_eq!(settings.domain.as_deref(), Some("https://example.com/v1"));
        assert!(settings.model.is_none());
        assert!(settings.api_key.is_none());
    }
}
