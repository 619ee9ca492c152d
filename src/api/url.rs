//! Endpoint URL construction.

use anyhow::{Context, Result};
use reqwest::Url;

/// Appends `path` to the path of `base`, with exactly one slash between.
///
/// The base path is kept as a fixed prefix; query and fragment of `base`
/// are preserved.
///
/// ```
/// use openrouter_cli::api::join_url;
///
/// let url = join_url("https://openrouter.ai/api/v1", "models").unwrap();
/// assert_eq!(url.as_str(), "https://openrouter.ai/api/v1/models");
/// ```
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid API domain: {base}"))?;
    let prefix = url.path().trim_end_matches('/').to_string();
    let suffix = path.trim_start_matches('/');
    url.set_path(&format!("{prefix}/{suffix}"));
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_join_plain() {
        assert_eq!(
            join_url("https://openrouter.ai/api/v1", "models")
                .unwrap()
                .as_str(),
            "https://openrouter.ai/api/v1/models"
        );
    }

    #[test]
    fn test_join_collapses_slashes() {
        assert_eq!(
            join_url("https://example.com/root/", "/chat/completions")
                .unwrap()
                .as_str(),
            "https://example.com/root/chat/completions"
        );
        assert_eq!(
            join_url("https://example.com/root///", "//models")
                .unwrap()
                .as_str(),
            "https://example.com/root/models"
        );
    }

    #[test]
    fn test_join_bare_host() {
        assert_eq!(
            join_url("https://example.com", "models").unwrap().as_str(),
            "https://example.com/models"
        );
    }

    #[test]
    fn test_join_is_repeatable() {
        let first = join_url("https://example.com/v1/", "chat/completions").unwrap();
        let second = join_url("https://example.com/v1/", "chat/completions").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_join_invalid_base() {
        let err = join_url("not a url", "models").unwrap_err();
        assert!(err.to_string().contains("Invalid API domain"));
    }
}
