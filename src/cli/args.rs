use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "openrouter")]
#[command(about = "Chat with OpenRouter and other OpenAI-compatible models")]
#[command(version)]
pub struct Args {
    /// Named configuration profile to apply on top of the base settings
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Suppress status messages
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or update the global configuration
    Config(ConfigArgs),
    /// Check connectivity and credentials via /models
    Test,
    /// Send a single prompt and print the reply
    Ask(AskArgs),
    /// Interactive chat session
    Repl {
        /// Model for this session
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// System prompt for this session
        #[arg(short = 's', long)]
        system: Option<String>,
    },
    /// Interactive setup of domain, model and API key
    Init,
    /// List available models
    Models {
        /// Case-insensitive search term
        query: Option<String>,
    },
    /// Show the account credit balance
    Credits,
    /// List profiles, or show one
    Profile {
        /// Profile to show
        name: Option<String>,
    },
}

impl Command {
    /// Subcommand name, used to label logged failures.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Test => "test",
            Self::Ask(_) => "ask",
            Self::Repl { .. } => "repl",
            Self::Init => "init",
            Self::Models { .. } => "models",
            Self::Credits => "credits",
            Self::Profile { .. } => "profile",
        }
    }
}

#[derive(ClapArgs, Debug, Default)]
pub struct ConfigArgs {
    /// API base URL (OpenAI-compatible)
    #[arg(long)]
    pub domain: Option<String>,

    /// Default model
    #[arg(long)]
    pub model: Option<String>,

    /// Persist an API key (prefer OPENROUTER_API_KEY for ephemeral use)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Write the changes to this profile instead of the base settings
    #[arg(long, value_name = "NAME")]
    pub profile_target: Option<String>,

    /// Delete the configuration file
    #[arg(long, conflicts_with_all = ["domain", "model", "api_key", "import"])]
    pub reset: bool,

    /// Skip the confirmation prompt for --reset
    #[arg(short = 'y', long, requires = "reset")]
    pub yes: bool,

    /// Replace the whole configuration with the JSON document in FILE
    #[arg(long, value_name = "FILE", conflicts_with_all = ["domain", "model", "api_key"])]
    pub import: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct AskArgs {
    /// Prompt text (read from stdin when omitted)
    pub prompt: Option<String>,

    /// Override the configured model
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short = 's', long)]
    pub system: Option<String>,

    /// Wait for the whole reply instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Print token usage after a non-streamed reply
    #[arg(long, requires = "no_stream")]
    pub usage: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_profile_after_subcommand() {
        let args = Args::try_parse_from(["openrouter", "ask", "hi", "--profile", "work"]).unwrap();
        assert_eq!(args.profile.as_deref(), Some("work"));
        let Command::Ask(ask) = args.command else {
            panic!("expected ask");
        };
        assert_eq!(ask.prompt.as_deref(), Some("hi"));
        assert!(!ask.no_stream);
    }

    #[test]
    fn test_config_patch_flags() {
        let args = Args::try_parse_from([
            "openrouter",
            "config",
            "--model",
            "openai/gpt-4o-mini",
            "--profile-target",
            "dev",
        ])
        .unwrap();
        let Command::Config(config) = args.command else {
            panic!("expected config");
        };
        assert_eq!(config.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(config.profile_target.as_deref(), Some("dev"));
        assert!(!config.reset);
    }

    #[test]
    fn test_reset_conflicts_with_patch() {
        assert!(Args::try_parse_from(["openrouter", "config", "--reset", "--model", "x"]).is_err());
        assert!(Args::try_parse_from(["openrouter", "config", "--yes"]).is_err());
    }

    #[test]
    fn test_usage_requires_no_stream() {
        assert!(Args::try_parse_from(["openrouter", "ask", "hi", "--usage"]).is_err());
        assert!(Args::try_parse_from(["openrouter", "ask", "hi", "--no-stream", "--usage"]).is_ok());
    }
}
