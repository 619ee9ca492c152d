use anyhow::Result;
use clap::Parser;
use exitcode::ExitCode;

use openrouter_cli::api::is_policy_error;
use openrouter_cli::cli::commands::{
    ask, configure, handle_policy_error, init, models, probe, profile, repl,
};
use openrouter_cli::cli::{Args, Command};
use openrouter_cli::config::ConfigStore;
use openrouter_cli::output::{self, OutputConfig};
use openrouter_cli::ui::Style;
use openrouter_cli::{logging, warn};

/// Exit status for failures without a more specific code.
const FAILURE: ExitCode = 1;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    output::init(OutputConfig::quiet(args.quiet));
    logging::init();

    let name = args.command.name();
    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            logging::log_error(&err, Some(name));
            if is_policy_error(&err) {
                handle_policy_error();
            } else {
                warn!("{} {err:#}", Style::error("Error:"));
            }
            FAILURE
        }
    };

    if code != exitcode::OK {
        std::process::exit(code);
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let active_profile = args.profile.as_deref();

    match args.command {
        Command::Config(config_args) => configure::run_config(config_args)?,
        Command::Test => return probe::run_test(active_profile).await,
        Command::Ask(ask_args) => return ask::run_ask(ask_args, active_profile).await,
        Command::Repl { model, system } => {
            return repl::run_repl(repl::ReplOptions { model, system }, active_profile).await;
        }
        Command::Init => {
            init::run_init(&ConfigStore::new()?).await?;
        }
        Command::Models { query } => models::run_models(active_profile, query.as_deref()).await?,
        Command::Credits => return probe::run_credits(active_profile).await,
        Command::Profile { name } => profile::run_profile(name.as_deref(), active_profile)?,
    }

    Ok(exitcode::OK)
}
