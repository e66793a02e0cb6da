//! Stream module - SSE decoding and incremental reply assembly

mod conversation;
mod decoder;

pub use conversation::{Conversation, Message, Role};
pub use decoder::{DecoderLimits, SseDecoder, UpstreamChunk};
