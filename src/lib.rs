//! # openrouter - chat with OpenAI-compatible models from the terminal
//!
//! `openrouter` talks to OpenRouter or any endpoint implementing the OpenAI
//! chat completions API. Replies stream to stdout as they arrive.
//!
//! ## Quick Start
//!
//! ```bash
//! # One-time setup
//! openrouter init
//!
//! # One-shot prompt
//! openrouter ask "Explain ownership in one paragraph"
//!
//! # Prompt from stdin, whole reply at once
//! cat notes.md | openrouter ask --no-stream -s "Summarize"
//!
//! # Interactive session
//! openrouter repl -m openai/gpt-4o-mini
//! ```
//!
//! ## Configuration
//!
//! Settings are resolved from three layers, lowest precedence first:
//!
//! 1. the base settings in `~/.config/openrouter-cli/config.json`
//! 2. the profile selected with `--profile`
//! 3. a project file (`.openrouterrc`, `.openrouterrc.json` or
//!    `.openrouterrc.toml`) in the current directory
//!
//! ```json
//! {
//!   "domain": "https://openrouter.ai/api/v1",
//!   "model": "meta-llama/llama-3.1-8b-instruct",
//!   "profiles": {
//!     "work": { "model": "openai/gpt-4o-mini" }
//!   }
//! }
//! ```
//!
//! `OPENROUTER_API_KEY` (then `OPENAI_API_KEY`) takes precedence over any
//! stored key.

/// OpenAI-compatible HTTP client, SSE decoding and model cache.
pub mod api;

/// API key lookup.
pub mod auth;

/// Interactive chat session.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration storage and layered resolution.
pub mod config;

/// File system utilities.
pub mod fs;

/// Prompt input from stdin.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
