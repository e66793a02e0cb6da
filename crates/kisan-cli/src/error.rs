use colored::Colorize;
use std::fmt::Display;

/// Single red line for errors that do not end the session.
pub fn print_error(err: impl Display) {
    eprintln!("{}", format!("Error: {err}").red());
}

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("connection refused") || msg.contains("error sending request") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Make sure the proxy is running and reachable:");
        eprintln!("  {} kisan --server http://127.0.0.1:8080 chat", "$".dimmed());
    }

    if msg.contains("unauthorized") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Pass a proxy token with --token or KISAN_PROXY_TOKEN.");
    }

    std::process::exit(1);
}
