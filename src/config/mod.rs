//! Layered configuration: global document, named profiles, project overrides.

mod project;
mod resolve;
mod store;
mod types;

pub use project::{PROJECT_FILES, load_project_override, parse_override};
pub use resolve::{ConfigResolver, resolve_layers};
pub use store::{ConfigError, ConfigStore};
pub use types::{
    ConfigDocument, DEFAULT_DOMAIN, DEFAULT_MODEL, ResolvedConfig, Settings, mask_key,
};
