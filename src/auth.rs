//! API key resolution.
//!
//! The key comes from the environment first, then from the resolved
//! configuration. When neither has one, an interactive setup flow may run
//! once before giving up. The key itself is never logged or persisted here.

use anyhow::Result;
use std::future::Future;
use std::io::IsTerminal;

use crate::config::ConfigResolver;

/// Environment variables carrying the API key, highest priority first.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "OPENAI_API_KEY"];

/// Shown when no key can be found.
pub const MISSING_KEY_MESSAGE: &str =
    "Missing API key. Set OPENROUTER_API_KEY / OPENAI_API_KEY or run 'openrouter init'.";

/// Outcome of [`ensure_api_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Found(String),
    Missing { message: String },
}

/// Returns the first non-empty API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
}

/// Returns the environment key, else `configured`.
pub fn effective_api_key(configured: Option<&str>) -> Option<String> {
    api_key_from_env().or_else(|| {
        configured
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    })
}

/// Whether interactive setup may run: stdout must be a terminal and the
/// caller must not have opted out.
pub fn setup_permitted(allow_setup: Option<bool>) -> bool {
    allow_setup != Some(false) && std::io::stdout().is_terminal()
}

/// Determines the API key for `profile`.
///
/// When no key is found and `allow_setup` is true, `setup` runs once; if it
/// reports that settings were saved, configuration is re-resolved and the
/// lookup retried. Only configuration I/O errors are returned as `Err`.
pub async fn ensure_api_key<F, Fut>(
    resolver: &ConfigResolver,
    profile: Option<&str>,
    allow_setup: bool,
    setup: F,
) -> Result<Credential>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let resolved = resolver.resolve(profile)?;
    let mut api_key = effective_api_key(resolved.api_key.as_deref());

    if api_key.is_none() && allow_setup {
        tracing::debug!("no API key found, starting setup");
        if setup().await? {
            let refreshed = resolver.resolve(profile)?;
            api_key = effective_api_key(refreshed.api_key.as_deref());
        }
    }

    Ok(api_key.map_or_else(
        || Credential::Missing {
            message: MISSING_KEY_MESSAGE.to_string(),
        },
        Credential::Found,
    ))
}
