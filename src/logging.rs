//! Diagnostic logging via `tracing`.
//!
//! User-facing messages go through the [`output`](crate::output) macros.
//! This module only covers diagnostics, filtered by `OPENROUTER_LOG`
//! (same syntax as `RUST_LOG`, default `warn`) and written to stderr.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "OPENROUTER_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Later calls are ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!crate::output::is_no_color())
                .with_target(false)
                .compact(),
        )
        .try_init()
        .ok();
}

/// Records a failed operation at `debug`. The user already sees the error
/// on stderr, so the default filter keeps this out of the output.
pub fn log_error(err: &anyhow::Error, context: Option<&str>) {
    let message = format!("{err:#}");
    match context {
        Some(context) => tracing::debug!(context, error = %message, "operation failed"),
        None => tracing::debug!(error = %message, "operation failed"),
    }
}
