use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use kisan_ai::{AiError, Language, Message};
use serde::Deserialize;
use tracing::Span;

use crate::api::{ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// Any JSON value; only an exact language code selects a language.
    #[serde(default)]
    pub language: Option<serde_json::Value>,
}

impl ChatRequest {
    pub fn language(&self) -> Language {
        Language::resolve(self.language.as_ref().and_then(serde_json::Value::as_str))
    }
}

/// POST /chat - Relay a streamed completion for the caller's conversation
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {err}")))?;
    let language = request.language();

    tracing::info!(
        language = language.code(),
        messages = request.messages.len(),
        "Forwarding chat request"
    );

    let upstream = state
        .upstream
        .open_stream(language, &request.messages)
        .await
        .inspect_err(log_upstream_failure)?;

    Ok(relay(upstream))
}

/// OPTIONS /chat - CORS headers are added by the CORS layer
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn log_upstream_failure(err: &AiError) {
    match err {
        AiError::RateLimited => tracing::warn!("Upstream rate limit hit"),
        AiError::QuotaExhausted => tracing::warn!("Upstream credits exhausted"),
        AiError::UpstreamHttp { status, message } => {
            tracing::error!(status, body = %message, "AI gateway error")
        }
        other => tracing::error!(error = %other, "Chat proxy error"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayEnd {
    Open,
    Finished,
    Failed,
}

// Logs how the relay ended once hyper drops the body.
struct RelayStats {
    span: Span,
    bytes: usize,
    end: RelayEnd,
}

impl RelayStats {
    fn observe<E>(&mut self, chunk: Option<&Result<Bytes, E>>) {
        match chunk {
            Some(Ok(bytes)) => self.bytes += bytes.len(),
            Some(Err(_)) => self.end = RelayEnd::Failed,
            None => self.end = RelayEnd::Finished,
        }
    }
}

impl Drop for RelayStats {
    fn drop(&mut self) {
        let _enter = self.span.enter();
        match self.end {
            RelayEnd::Finished => tracing::debug!(bytes = self.bytes, "Relay finished"),
            RelayEnd::Failed => tracing::debug!(bytes = self.bytes, "Relay ended on upstream error"),
            RelayEnd::Open => {
                tracing::debug!(bytes = self.bytes, "Relay closed before upstream finished")
            }
        }
    }
}

/// Stream the upstream body through unchanged.
///
/// The body owns the upstream response: when the client goes away hyper drops
/// the body and the upstream connection closes with it.
fn relay(upstream: reqwest::Response) -> Response {
    let mut stats = RelayStats {
        span: Span::current(),
        bytes: 0,
        end: RelayEnd::Open,
    };

    let stream = async_stream::stream! {
        let mut chunks = upstream.bytes_stream();
        loop {
            let chunk = chunks.next().await;
            stats.observe(chunk.as_ref());
            match chunk {
                Some(Ok(bytes)) => yield Ok(bytes),
                Some(Err(err)) => {
                    tracing::warn!(parent: &stats.span, error = %err, "Upstream stream failed");
                    yield Err(err);
                    break;
                }
                None => break,
            }
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> RelayStats {
        RelayStats {
            span: Span::none(),
            bytes: 0,
            end: RelayEnd::Open,
        }
    }

    #[test]
    fn upstream_error_is_not_a_clean_finish() {
        let mut stats = stats();
        stats.observe::<std::io::Error>(Some(&Ok(Bytes::from_static(b"data: x\n\n"))));
        stats.observe::<std::io::Error>(Some(&Err(std::io::Error::other("reset"))));
        assert_eq!(stats.end, RelayEnd::Failed);
        assert_eq!(stats.bytes, 9);
    }

    #[test]
    fn end_of_body_marks_the_relay_finished() {
        let mut stats = stats();
        assert_eq!(stats.end, RelayEnd::Open);
        stats.observe::<std::io::Error>(Some(&Ok(Bytes::from_static(b"abc"))));
        stats.observe::<std::io::Error>(None);
        assert_eq!(stats.end, RelayEnd::Finished);
        assert_eq!(stats.bytes, 3);
    }

    #[test]
    fn language_field_of_any_type_is_accepted() {
        for body in [
            r#"{"messages":[],"language":5}"#,
            r#"{"messages":[],"language":null}"#,
            r#"{"messages":[],"language":{"code":"hi"}}"#,
            r#"{"messages":[]}"#,
        ] {
            let request: ChatRequest = serde_json::from_slice(body.as_bytes()).unwrap();
            assert_eq!(request.language(), Language::English, "body: {body}");
        }
        let request: ChatRequest =
            serde_json::from_slice(br#"{"messages":[],"language":"ta"}"#).unwrap();
        assert_eq!(request.language(), Language::Tamil);
    }
}
