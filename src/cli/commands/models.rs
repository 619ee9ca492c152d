//! `models` command.

use anyhow::Result;
use std::sync::Arc;

use crate::api::{ChatClient, ModelCache, ModelInfo, filter_models};
use crate::auth::effective_api_key;
use crate::config::{ConfigResolver, DEFAULT_MODEL, ResolvedConfig};
use crate::ui::Style;
use crate::{logging, status};

/// Maximum number of rows printed.
pub const LIST_LIMIT: usize = 25;

/// Overrides the model printed when the listing is unavailable.
pub const MODEL_ENV_VAR: &str = "OPENROUTER_MODEL";

/// Lists models through `cache`, which must only ever be used with the
/// domain of `client`.
pub async fn fetch_models(cache: &ModelCache, client: &ChatClient) -> Result<Arc<Vec<ModelInfo>>> {
    cache
        .get_or_fetch(move || async move { Ok(client.list_models().await?.data) })
        .await
}

/// Prints matching model ids. The listing does not need an API key; when it
/// fails, the configured model is printed instead.
pub async fn run_models(profile: Option<&str>, query: Option<&str>) -> Result<()> {
    let config = ConfigResolver::new()?.resolve(profile)?;
    let api_key = effective_api_key(config.api_key.as_deref()).unwrap_or_default();
    let client = ChatClient::new(config.domain_or_default(), api_key)?;

    match fetch_models(&ModelCache::default(), &client).await {
        Ok(models) => {
            let query = query.unwrap_or_default();
            let matches = filter_models(query, &models, LIST_LIMIT);
            if matches.is_empty() {
                status!("No models match '{query}'");
            }
            print_models(&matches);
        }
        Err(err) => {
            logging::log_error(&err, Some("models"));
            status!("{} Could not list models: {err:#}", Style::warning("!"));
            let env_model = std::env::var(MODEL_ENV_VAR).ok();
            println!("{}", fallback_model(env_model.as_deref(), &config));
        }
    }
    Ok(())
}

pub fn print_models(models: &[&ModelInfo]) {
    let width = models.iter().map(|m| m.id.len()).max().unwrap_or(0);
    for model in models {
        match model.name.as_deref() {
            Some(name) => println!("{:<width$}  {}", model.id, Style::secondary(name)),
            None => println!("{}", model.id),
        }
    }
}

fn fallback_model<'a>(env_model: Option<&'a str>, config: &'a ResolvedConfig) -> &'a str {
    env_model
        .filter(|m| !m.is_empty())
        .or(config.model.as_deref())
        .unwrap_or(DEFAULT_MODEL)
}
