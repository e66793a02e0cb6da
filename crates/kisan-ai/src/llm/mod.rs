//! LLM module - upstream chat-completion client

mod client;
mod completions;

pub use client::{ChatMessage, ChatRole, build_messages};
pub use completions::{ChatCompletionsClient, DEFAULT_BASE_URL, DEFAULT_MODEL, response_to_error};
