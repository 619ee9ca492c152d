//! Subcommand implementations.
//!
//! Handlers that talk to the API return an [`exitcode::ExitCode`] so a
//! missing key can end the process with `CONFIG` instead of a generic
//! failure.

use anyhow::Result;
use inquire::Confirm;
use std::io::IsTerminal;

use crate::api::{ChatClient, PRIVACY_URL};
use crate::auth::{Credential, ensure_api_key, setup_permitted};
use crate::config::{ConfigResolver, ResolvedConfig};
use crate::ui::{self, Style};
use crate::warn;

/// One-shot prompt handler.
pub mod ask;

/// Configuration display and updates.
pub mod configure;

/// Interactive setup wizard.
pub mod init;

/// Model listing.
pub mod models;

/// Connectivity and credits probes.
pub mod probe;

/// Profile listing.
pub mod profile;

/// Interactive chat handler.
pub mod repl;

/// Resolved settings and a client ready for API calls.
pub struct Connection {
    pub config: ResolvedConfig,
    pub client: ChatClient,
}

/// Resolves settings and the API key for `profile`.
///
/// On a terminal the setup wizard is offered when no key is configured.
/// When a key still cannot be found the fixed message is printed and `None`
/// returned.
pub async fn connect(profile: Option<&str>) -> Result<Option<Connection>> {
    let resolver = ConfigResolver::new()?;
    let credential = ensure_api_key(&resolver, profile, setup_permitted(None), || {
        init::run_init(resolver.store())
    })
    .await?;

    let api_key = match credential {
        Credential::Found(key) => key,
        Credential::Missing { message } => {
            warn!("{}", Style::error(message));
            return Ok(None);
        }
    };

    let config = resolver.resolve(profile)?;
    let client = ChatClient::new(config.domain_or_default(), api_key)?;
    Ok(Some(Connection { config, client }))
}

/// Explains a provider data-policy rejection. On a terminal, offers to open
/// the privacy settings page.
pub fn handle_policy_error() {
    warn!(
        "{}\n{} {}",
        Style::warning("This model may require enabling free endpoints that can publish prompts."),
        Style::label("Open privacy settings:"),
        Style::value(PRIVACY_URL)
    );

    if !(std::io::stdin().is_terminal() && std::io::stderr().is_terminal()) {
        warn!("{}", Style::hint("Tip: run 'openrouter models' to pick another model."));
        return;
    }

    match Confirm::new("Open settings now?").with_default(true).prompt() {
        Ok(true) => ui::open_url(PRIVACY_URL),
        Ok(false) => {
            warn!(
                "{}",
                Style::hint("You can also run 'openrouter models' to choose a different model.")
            );
        }
        Err(err) => tracing::debug!(%err, "policy prompt ended"),
    }
}
