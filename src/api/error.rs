use reqwest::Response;
use thiserror::Error;

/// Provider privacy settings, offered when a request hits a policy error.
pub const PRIVACY_URL: &str = "https://openrouter.ai/settings/privacy";

const POLICY_PHRASES: &[&str] = &["data policy", "free model publication"];

/// Transport-level failures. Never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        /// Response body, compact JSON when it parses as JSON, raw text otherwise.
        body: String,
    },

    /// A streaming response arrived without a body.
    #[error("HTTP {status} {status_text}: response has no body")]
    MissingBody { status: u16, status_text: String },
}

impl ApiError {
    /// Consumes a failed response into an error carrying its status and body.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let text = response.text().await.unwrap_or_default();

        Self::Status {
            status: status.as_u16(),
            status_text,
            body: render_body(&text),
        }
    }

    pub const fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } | Self::MissingBody { status, .. } => *status,
        }
    }
}

fn render_body(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .map_or_else(|_| text.to_string(), |value| value.to_string())
}

/// Returns `true` for provider errors about data-policy or free-model
/// publication restrictions, which the user can fix in account settings.
pub fn is_policy_error(err: &anyhow::Error) -> bool {
    let message = format!("{err:#}").to_lowercase();
    POLICY_PHRASES.iter().any(|phrase| message.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 400,
            status_text: "Bad Request".to_string(),
            body: render_body(r#"{ "error": "test-error" }"#),
        };

        assert_eq!(
            err.to_string(),
            r#"HTTP 400 Bad Request: {"error":"test-error"}"#
        );
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_render_body_text() {
        assert_eq!(render_body("upstream timeout"), "upstream timeout");
        assert_eq!(render_body(""), "");
    }

    #[test]
    fn test_is_policy_error() {
        let policy = anyhow::anyhow!(
            "HTTP 404 Not Found: No endpoints found matching your data policy"
        );
        assert!(is_policy_error(&policy));

        let publication = anyhow::Error::new(ApiError::Status {
            status: 403,
            status_text: "Forbidden".to_string(),
            body: "Free model publication is disabled".to_string(),
        });
        assert!(is_policy_error(&publication));

        let wrapped = anyhow::anyhow!("Data Policy restriction").context("Streaming failed");
        assert!(is_policy_error(&wrapped));

        assert!(!is_policy_error(&anyhow::anyhow!("HTTP 500 Internal Server Error")));
    }
}
