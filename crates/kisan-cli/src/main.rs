mod cli;
mod commands;
mod config;
mod error;

use anyhow::Result;
use clap::Parser;
use cli::{ChatArgs, Cli, Commands};
use config::CliConfig;
use kisan_ai::NoSpeech;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "kisan=debug,kisan_ai=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load();
    let server = config.server_url(cli.server.as_deref());
    let token = config.token(cli.token);

    match cli.command.unwrap_or(Commands::Chat(ChatArgs::default())) {
        Commands::Chat(args) => {
            let session = commands::open_session(&server, token, config.language(args.language))?;
            commands::chat::run(session, &NoSpeech).await
        }
        Commands::Ask(args) => {
            let session = commands::open_session(&server, token, config.language(args.language))?;
            commands::ask::run(session, &args.question).await
        }
        Commands::Languages => commands::languages::run(),
    }
}
