pub mod ask;
pub mod chat;
pub mod languages;

use anyhow::{Context, Result};
use colored::Colorize;
use kisan_ai::{ChatClient, ChatSession, Language, ReplyOutcome, build_http_client};
use std::io::Write;
use tokio_util::sync::CancellationToken;

pub fn open_session(server: &str, token: Option<String>, language: Language) -> Result<ChatSession> {
    let http = build_http_client(None).context("Failed to build HTTP client")?;
    let client = ChatClient::new(http, server).with_token(token);
    tracing::debug!(endpoint = client.endpoint(), "Using chat proxy");
    Ok(ChatSession::new(client, language))
}

/// Send `text` and print the reply as it streams in.
///
/// Ctrl-C cancels the reply in flight; whatever arrived stays in the
/// conversation.
pub async fn stream_answer(session: &mut ChatSession, text: &str) -> Result<Option<ReplyOutcome>> {
    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut stdout = std::io::stdout();
    let result = session
        .send(text, &cancel, |fragment, _| {
            let _ = write!(stdout, "{fragment}");
            let _ = stdout.flush();
        })
        .await;
    interrupt.abort();

    let outcome = result?;
    match outcome {
        Some(ReplyOutcome::Cancelled) => println!("\n{}", "(reply cancelled)".dimmed()),
        Some(ReplyOutcome::Closed) => {
            tracing::debug!("Reply ended without completion marker");
            println!();
        }
        Some(ReplyOutcome::Completed) => println!(),
        None => {}
    }
    Ok(outcome)
}
