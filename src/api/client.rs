use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;

use super::error::ApiError;
use super::sse::{StreamHooks, decode_event_stream, forward_text};
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Completion, Credits, Message,
    ModelList, Role, Usage,
};
use super::url::join_url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request chat parameters.
#[derive(Debug, Default)]
pub struct ChatOptions<'a> {
    pub model: String,
    /// Prepended as a system message when non-empty.
    pub system: Option<String>,
    pub stream: bool,
    /// UI notifications, ignored by [`ChatClient::ask_once`].
    pub hooks: StreamHooks<'a>,
}

impl ChatOptions<'_> {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            stream: true,
            ..Self::default()
        }
    }
}

/// Client for one OpenAI-compatible endpoint and API key.
///
/// An empty key sends no `Authorization` header, which is enough for public
/// endpoints such as the model list.
pub struct ChatClient {
    client: Client,
    domain: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("openrouter-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_http_client(client, domain, api_key))
    }

    /// Uses a preconfigured `reqwest` client.
    pub fn with_http_client(
        client: Client,
        domain: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            domain: domain.into(),
            api_key: api_key.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Connectivity and credential probe against the model list.
    ///
    /// Returns the response body as JSON, or as a JSON string when the body
    /// is not JSON.
    pub async fn test_connection(&self) -> Result<serde_json::Value> {
        let response = self.get("models").await?;
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    pub async fn list_models(&self) -> Result<ModelList> {
        self.get_json("models").await
    }

    pub async fn get_credits(&self) -> Result<Credits> {
        self.get_json("credits").await
    }

    /// Sends a non-streaming completion and returns the first choice's text.
    pub async fn ask_once(
        &self,
        options: &ChatOptions<'_>,
        messages: &[ChatMessage],
    ) -> Result<Completion> {
        let request = ChatCompletionRequest {
            model: &options.model,
            messages: normalize_messages(options.system.as_deref(), messages),
            stream: false,
        };

        let response = self.post_chat(&request).await?;
        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion response")?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(Completion {
            text,
            usage: body.usage,
        })
    }

    /// Sends a streaming completion and hands each text delta to `sink`.
    ///
    /// Fails before decoding starts when the server rejects the request.
    /// The response body is dropped on every exit path, including right
    /// after the sentinel.
    pub async fn stream_chat(
        &self,
        options: ChatOptions<'_>,
        messages: &[ChatMessage],
        sink: impl FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        let request = ChatCompletionRequest {
            model: &options.model,
            messages: normalize_messages(options.system.as_deref(), messages),
            stream: true,
        };

        let response = self.post_chat(&request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            let status = response.status();
            return Err(ApiError::MissingBody {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            }
            .into());
        }

        let text_stream = decode_event_stream(response.bytes_stream());
        forward_text(text_stream, options.hooks, sink).await
    }

    /// Dispatches on `options.stream`. A one-shot reply reaches `sink` as a
    /// single fragment with the same hooks fired, and its usage is returned.
    pub async fn chat(
        &self,
        options: ChatOptions<'_>,
        messages: &[ChatMessage],
        sink: impl FnMut(&str) -> Result<()>,
    ) -> Result<Option<Usage>> {
        if options.stream {
            self.stream_chat(options, messages, sink).await?;
            return Ok(None);
        }

        let completion = self.ask_once(&options, messages).await?;
        let whole = futures_util::stream::iter([Ok(completion.text)]);
        forward_text(whole, options.hooks, sink).await?;
        Ok(completion.usage)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = join_url(&self.domain, path)?;
        tracing::debug!(%url, "GET");
        let request = self.authorized(self.client.get(url.clone()));
        send_checked(request, url.as_str()).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse response from /{path}"))
    }

    async fn post_chat(&self, body: &ChatCompletionRequest<'_>) -> Result<Response> {
        let url = join_url(&self.domain, "chat/completions")?;
        tracing::debug!(%url, model = body.model, stream = body.stream, "POST");
        let request = self.authorized(self.client.post(url.clone()).json(body));
        send_checked(request, url.as_str()).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }
}

async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response> {
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to connect to API endpoint: {url}"))?;

    if !response.status().is_success() {
        return Err(ApiError::from_response(response).await.into());
    }
    Ok(response)
}

/// Prepends the system prompt, if any, to the caller's messages.
fn normalize_messages<'a>(system: Option<&'a str>, messages: &'a [ChatMessage]) -> Vec<Message<'a>> {
    let system = system.filter(|s| !s.is_empty()).map(|content| Message {
        role: Role::System,
        content: Cow::Borrowed(content),
    });

    system
        .into_iter()
        .chain(messages.iter().map(|m| Message {
            role: m.role,
            content: Cow::Borrowed(&m.content),
        }))
        .collect()
}
