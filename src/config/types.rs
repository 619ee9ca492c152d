use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback API domain when no layer sets one.
pub const DEFAULT_DOMAIN: &str = "https://openrouter.ai/api/v1";

/// Fallback model when no layer sets one.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";

/// One configuration layer: the base document's top-level fields, a
/// profile entry, a project override, or a patch.
///
/// Every field is optional; an unset field falls through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Default model identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Persisted API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Settings {
    /// Returns `self` with every field that `over` sets replaced.
    #[must_use]
    pub fn overlay(self, over: &Self) -> Self {
        Self {
            domain: over.domain.clone().or(self.domain),
            model: over.model.clone().or(self.model),
            api_key: over.api_key.clone().or(self.api_key),
        }
    }

    /// Returns `true` when no field is set.
    pub const fn is_empty(&self) -> bool {
        self.domain.is_none() && self.model.is_none() && self.api_key.is_none()
    }

    /// Copy with the API key masked for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_deref().map(mask_key),
            ..self.clone()
        }
    }
}

/// The persisted global configuration document.
///
/// Corresponds to `~/.config/openrouter-cli/config.json`. Profile entries
/// are plain [`Settings`], so a nested `profiles` map cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(flatten)]
    pub base: Settings,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Settings>,
}

impl ConfigDocument {
    /// Copy with every API key (base and profiles) masked for display.
    ///
    /// The stored document is never touched.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            base: self.base.redacted(),
            profiles: self
                .profiles
                .iter()
                .map(|(name, profile)| (name.clone(), profile.redacted()))
                .collect(),
        }
    }
}

/// Effective configuration for one invocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub domain: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl ResolvedConfig {
    pub fn domain_or_default(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

impl From<Settings> for ResolvedConfig {
    fn from(settings: Settings) -> Self {
        Self {
            domain: settings.domain,
            model: settings.model,
            api_key: settings.api_key,
        }
    }
}

/// Masks an API key for display: first four and last four characters are
/// kept, keys of eight characters or fewer are fully masked.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}
