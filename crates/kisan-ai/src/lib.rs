//! Kisan Mitra AI building blocks.
//!
//! - [`language`]: the fixed language table and its system prompts
//! - [`llm`]: the upstream chat-completion client used by the proxy
//! - [`stream`]: SSE decoding and conversation merging
//! - [`client`]: the chat client that consumes the proxy's stream

pub mod client;
pub mod error;
mod http_client;
pub mod language;
pub mod llm;
pub mod stream;

pub use client::{ChatClient, ChatSession, NoSpeech, ReplyOutcome, SpeechCapability};
pub use error::{AiError, Result};
pub use http_client::build_http_client;
pub use language::Language;
pub use llm::{ChatCompletionsClient, ChatMessage, ChatRole};
pub use stream::{Conversation, DecoderLimits, Message, Role, SseDecoder};
