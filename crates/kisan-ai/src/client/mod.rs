//! Client side of the chat proxy: request, stream consumption, session state.

mod chat;
mod session;
mod speech;

pub use chat::{ChatClient, ReplyOutcome};
pub use session::ChatSession;
pub use speech::{NoSpeech, SpeechCapability};
