use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::api::{
    ChatClient, ChatMessage, ChatOptions, ModelCache, StreamHooks, filter_models, is_policy_error,
};
use crate::cli::commands::handle_policy_error;
use crate::cli::commands::models::{LIST_LIMIT, fetch_models, print_models};
use crate::logging;
use crate::output;
use crate::ui::{Spinner, Style};

/// Settings a session starts with. Model and system prompt can change
/// during the session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub model: String,
    pub system: Option<String>,
    pub domain: String,
    pub profile: Option<String>,
}

/// Interactive chat that keeps the conversation as history.
///
/// Every turn sends the whole history, so the model sees earlier replies.
/// A turn that fails leaves the history as it was before the turn.
pub struct ChatSession {
    config: SessionConfig,
    client: ChatClient,
    history: Vec<ChatMessage>,
    models: ModelCache,
}

impl ChatSession {
    pub fn new(config: SessionConfig, client: ChatClient) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
            models: ModelCache::default(),
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.config.model);

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Command(cmd) => {
                        if !self.handle_command(cmd).await {
                            break;
                        }
                    }
                    Input::Text(text) => {
                        if let Err(err) = self.send(text).await {
                            logging::log_error(&err, Some("repl"));
                            if is_policy_error(&err) {
                                handle_policy_error();
                            } else {
                                ui::print_error(&format!("{err:#}"));
                            }
                        }
                    }
                },
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => {
                    println!();
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    /// Applies a slash command. Returns `false` when the session should end.
    async fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Model(None) => {
                println!("{}", Style::value(&self.config.model));
            }
            SlashCommand::Model(Some(model)) => {
                println!("{} Model set to {}", Style::success("✓"), Style::value(&model));
                self.config.model = model;
            }
            SlashCommand::System(None) => match self.config.system.as_deref() {
                Some(system) => println!("{system}"),
                None => println!("{}", Style::secondary("(no system prompt)")),
            },
            SlashCommand::System(Some(system)) if system == "-" => {
                self.config.system = None;
                println!("{} System prompt cleared", Style::success("✓"));
            }
            SlashCommand::System(Some(system)) => {
                self.config.system = Some(system);
                println!("{} System prompt set", Style::success("✓"));
            }
            SlashCommand::Clear => {
                self.history.clear();
                println!("{} Conversation cleared", Style::success("✓"));
            }
            SlashCommand::Models(query) => self.show_models(query.as_deref()).await,
            SlashCommand::Config => ui::print_config(&self.config, self.history.len()),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return false,
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        true
    }

    async fn show_models(&self, query: Option<&str>) {
        match fetch_models(&self.models, &self.client).await {
            Ok(models) => print_models(&filter_models(
                query.unwrap_or_default(),
                &models,
                LIST_LIMIT,
            )),
            Err(err) => ui::print_error(&format!("Could not list models: {err:#}")),
        }
        println!();
    }

    /// Streams a reply to `text` and records both sides of the turn.
    async fn send(&mut self, text: String) -> Result<()> {
        self.history.push(ChatMessage::user(text));

        let spinner = Spinner::new("Thinking...");
        let mut reply = String::new();
        let options = ChatOptions {
            model: self.config.model.clone(),
            system: self.config.system.clone(),
            stream: true,
            hooks: StreamHooks::new().on_first_token(|| spinner.stop()),
        };

        let result = self
            .client
            .stream_chat(options, &self.history, |fragment| {
                reply.push_str(fragment);
                Ok(output::write_fragment(fragment)?)
            })
            .await;
        spinner.stop();
        println!();
        println!();

        match result {
            Ok(()) => {
                self.history.push(ChatMessage::assistant(reply));
                Ok(())
            }
            Err(err) => {
                self.history.pop();
                Err(err)
            }
        }
    }
}
