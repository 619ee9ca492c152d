//! Client for OpenAI-compatible chat endpoints.
//!
//! Covers chat completions (one-shot and streamed), the model list and the
//! credits probe. Server-sent events are decoded by [`EventStreamDecoder`],
//! which does no I/O of its own.

mod client;
mod error;
mod models;
mod sse;
mod types;
mod url;

pub use client::{ChatClient, ChatOptions};
pub use error::{ApiError, PRIVACY_URL, is_policy_error};
pub use models::{DEFAULT_MODEL_TTL, ModelCache, filter_models};
pub use sse::{
    DONE_SENTINEL, Decoded, EventStreamDecoder, StreamHooks, decode_event_stream, forward_text,
};
pub use types::{ChatMessage, Completion, Credits, CreditsData, ModelInfo, ModelList, Role, Usage};
pub use url::join_url;
