use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(model: &str) {
    println!(
        "{} {} - chatting with {}",
        Style::header("openrouter"),
        Style::version(format!("v{VERSION}")),
        Style::value(model)
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &SessionConfig, turns: usize) {
    println!("{}", Style::header("Session"));
    println!("  {}    {}", Style::label("model"), Style::value(&config.model));
    println!(
        "  {}   {}",
        Style::label("system"),
        config
            .system
            .as_deref()
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!(
        "  {}   {}",
        Style::label("domain"),
        Style::secondary(&config.domain)
    );
    println!(
        "  {}  {}",
        Style::label("profile"),
        config
            .profile
            .as_deref()
            .map_or_else(|| Style::secondary("(base)"), Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("history"),
        Style::value(format!("{turns} messages"))
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = SLASH_COMMANDS.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    for (cmd, description) in SLASH_COMMANDS {
        println!(
            "  {}  {}",
            Style::command(format!("{cmd:<width$}")),
            Style::secondary(description)
        );
    }
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
