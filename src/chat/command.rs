use inquire::autocompletion::{Autocomplete, Replacement};

// (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/model", "Show or switch the model"),
    ("/system", "Show, set or clear (/system -) the system prompt"),
    ("/clear", "Forget the conversation so far"),
    ("/models", "Search available models"),
    ("/config", "Show session settings"),
    ("/help", "Show available commands"),
    ("/quit", "Exit the session"),
];

#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(char::is_whitespace) {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// `None` shows the current model.
    Model(Option<String>),
    /// `None` shows the current prompt; `-` clears it.
    System(Option<String>),
    Clear,
    Models(Option<String>),
    Config,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }
    if input == "exit" {
        return Input::Command(SlashCommand::Quit);
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let (name, rest) = cmd
        .split_once(char::is_whitespace)
        .map_or((cmd, ""), |(name, rest)| (name, rest.trim()));
    let argument = (!rest.is_empty()).then(|| rest.to_string());

    let command = match name {
        "model" => SlashCommand::Model(argument),
        "system" => SlashCommand::System(argument),
        "clear" => SlashCommand::Clear,
        "models" => SlashCommand::Models(argument),
        "config" => SlashCommand::Config,
        "help" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(cmd.to_string()),
    };
    Input::Command(command)
}
