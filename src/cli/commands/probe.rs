//! `test` and `credits` commands.

use anyhow::{Context, Result};
use exitcode::ExitCode;

use super::connect;
use crate::api::CreditsData;
use crate::ui::Style;

/// Queries `/models` and prints the raw response.
pub async fn run_test(profile: Option<&str>) -> Result<ExitCode> {
    let Some(connection) = connect(profile).await? else {
        return Ok(exitcode::CONFIG);
    };

    let response = connection.client.test_connection().await?;
    let json = serde_json::to_string_pretty(&response).context("Failed to format response")?;
    println!("{json}");
    Ok(exitcode::OK)
}

pub async fn run_credits(profile: Option<&str>) -> Result<ExitCode> {
    let Some(connection) = connect(profile).await? else {
        return Ok(exitcode::CONFIG);
    };

    let credits = connection.client.get_credits().await?;
    print_credits(&credits.data);
    Ok(exitcode::OK)
}

fn print_credits(data: &CreditsData) {
    println!("{}", Style::header("Credits"));
    println!(
        "  {}      {}",
        Style::label("total"),
        Style::value(format!("{:.4}", data.total_credits))
    );
    println!(
        "  {}       {}",
        Style::label("used"),
        Style::value(format!("{:.4}", data.total_usage))
    );
    println!(
        "  {}  {}",
        Style::label("remaining"),
        Style::value(format!("{:.4}", data.remaining()))
    );
}
