//! OpenAI-compatible chat-completion client

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::error::{AiError, Result};
use crate::language::Language;
use crate::llm::client::{ChatMessage, build_messages};
use crate::stream::Message;

pub const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

// Truncate error bodies to prevent leaking large or sensitive responses into logs.
const MAX_ERROR_BODY: usize = 512;

/// Client for the upstream chat-completion endpoint.
///
/// Holds the server-side credential; it is only ever sent upstream.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct StreamingRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

impl ChatCompletionsClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set custom base URL (for API-compatible services)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Start a streamed completion and return the upstream response once its
    /// headers arrive with a success status.
    ///
    /// A single attempt is made. The body is left unread so the caller can
    /// relay it.
    pub async fn open_stream(&self, language: Language, conversation: &[Message]) -> Result<Response> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        let body = StreamingRequest {
            model: &self.model,
            messages: build_messages(language, conversation),
            stream: true,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(response_to_error(response).await)
    }
}

/// Classify a non-success upstream response.
pub async fn response_to_error(response: Response) -> AiError {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => AiError::QuotaExhausted,
        status => {
            let body = response.text().await.unwrap_or_default();
            AiError::UpstreamHttp {
                status: status.as_u16(),
                message: truncate(body),
            }
        }
    }
}

fn truncate(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &body[..end])
}
