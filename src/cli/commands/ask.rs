use anyhow::Result;
use exitcode::ExitCode;

use super::connect;
use crate::api::{ChatMessage, ChatOptions, StreamHooks, Usage};
use crate::cli::args::AskArgs;
use crate::input::InputReader;
use crate::output;
use crate::ui::{Spinner, Style};

/// Sends one prompt and writes the reply to stdout.
pub async fn run_ask(args: AskArgs, profile: Option<&str>) -> Result<ExitCode> {
    let prompt = InputReader::prompt(args.prompt)?;
    let Some(connection) = connect(profile).await? else {
        return Ok(exitcode::CONFIG);
    };

    let model = args
        .model
        .unwrap_or_else(|| connection.config.model_or_default().to_string());
    tracing::debug!(model, stream = !args.no_stream, "ask");

    let spinner = Spinner::new("Thinking...");
    let options = ChatOptions {
        model,
        system: args.system,
        stream: !args.no_stream,
        hooks: StreamHooks::new().on_first_token(|| spinner.stop()),
    };

    let result = connection
        .client
        .chat(options, &[ChatMessage::user(prompt)], |fragment| {
            Ok(output::write_fragment(fragment)?)
        })
        .await;
    spinner.stop();
    let usage = result?;
    println!();

    if args.usage
        && let Some(usage) = usage
    {
        print_usage(&usage);
    }
    Ok(exitcode::OK)
}

fn print_usage(usage: &Usage) {
    let count = |n: Option<u64>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
    eprintln!(
        "{} prompt {} · completion {} · total {}",
        Style::label("tokens"),
        Style::value(count(usage.prompt_tokens)),
        Style::value(count(usage.completion_tokens)),
        Style::value(count(usage.total_tokens))
    );
}
