use anyhow::Result;
use exitcode::ExitCode;

use super::connect;
use crate::chat::{ChatSession, SessionConfig};

pub struct ReplOptions {
    pub model: Option<String>,
    pub system: Option<String>,
}

pub async fn run_repl(options: ReplOptions, profile: Option<&str>) -> Result<ExitCode> {
    let Some(connection) = connect(profile).await? else {
        return Ok(exitcode::CONFIG);
    };

    let config = SessionConfig {
        model: options
            .model
            .unwrap_or_else(|| connection.config.model_or_default().to_string()),
        system: options.system,
        domain: connection.config.domain_or_default().to_string(),
        profile: profile.map(str::to_string),
    };

    ChatSession::new(config, connection.client).run().await?;
    Ok(exitcode::OK)
}
