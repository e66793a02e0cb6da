use clap::{Args, Parser, Subcommand};
use kisan_ai::Language;

#[derive(Parser)]
#[command(name = "kisan")]
#[command(version, about = "Kisan Mitra - farming assistant in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Proxy base URL (defaults to the config file, then http://127.0.0.1:8080)
    #[arg(long, global = true, env = "KISAN_PROXY_URL")]
    pub server: Option<String>,

    /// Bearer token presented to the proxy
    #[arg(long, global = true, env = "KISAN_PROXY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat(ChatArgs),

    /// Ask a single question and stream the answer
    Ask(AskArgs),

    /// List supported reply languages
    Languages,
}

#[derive(Args, Default)]
pub struct ChatArgs {
    /// Reply language: en, hi, te, ta or kn
    #[arg(short, long, env = "KISAN_LANGUAGE")]
    pub language: Option<Language>,
}

#[derive(Args)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Reply language: en, hi, te, ta or kn
    #[arg(short, long, env = "KISAN_LANGUAGE")]
    pub language: Option<Language>,
}
