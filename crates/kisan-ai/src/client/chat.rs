use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{AiError, Result};
use crate::language::Language;
use crate::stream::{Conversation, Message, SseDecoder};

/// How a reply stream ended, when it ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The termination sentinel was received.
    Completed,
    /// The connection closed without a sentinel.
    Closed,
    /// The caller cancelled; partial content stays in the conversation.
    Cancelled,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
    language: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the proxy's `POST /chat` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl ChatClient {
    /// `base_url` is the proxy root; the chat path is appended.
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
            token: None,
        }
    }

    /// Bearer token presented to the proxy.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the whole conversation and merge the streamed reply into it.
    ///
    /// `on_update` sees every fragment together with the assistant message it
    /// was merged into. Network failure before the first fragment leaves the
    /// conversation untouched; failure later keeps what was received.
    pub async fn stream_reply<F>(
        &self,
        conversation: &mut Conversation,
        language: Language,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> Result<ReplyOutcome>
    where
        F: FnMut(&str, &Message),
    {
        let mut request = self.http.post(&self.endpoint).json(&ChatRequest {
            messages: conversation.messages(),
            language: language.code(),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Ok(ReplyOutcome::Cancelled),
            result = request.send() => result.map_err(|e| AiError::Connection(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(AiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Reply stream cancelled");
                    return Ok(ReplyOutcome::Cancelled);
                }
                next = body.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    merge(conversation, decoder.push(&chunk), &mut on_update);
                    if decoder.is_done() {
                        return Ok(ReplyOutcome::Completed);
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Reply stream interrupted");
                    return Err(AiError::Connection(e.to_string()));
                }
                None => break,
            }
        }

        merge(conversation, decoder.finish(), &mut on_update);
        Ok(ReplyOutcome::Closed)
    }
}

fn merge<F>(conversation: &mut Conversation, fragments: Vec<String>, on_update: &mut F)
where
    F: FnMut(&str, &Message),
{
    for fragment in fragments {
        if let Some(message) = conversation.apply_fragment(&fragment) {
            on_update(&fragment, message);
        }
    }
}
