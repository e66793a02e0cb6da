//! Conversation model and in-place reply merging

use serde::{Deserialize, Serialize};

/// Role of a caller-visible message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, position-addressed list of messages held by one chat view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Merge a streamed fragment into the reply.
    ///
    /// Grows the trailing assistant message in place, or starts one if the
    /// conversation does not end with an assistant message. Returns the
    /// updated message, or `None` for an empty fragment.
    pub fn apply_fragment(&mut self, fragment: &str) -> Option<&Message> {
        if fragment.is_empty() {
            return None;
        }

        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.content.push_str(fragment),
            _ => self.messages.push(Message::assistant(fragment)),
        }
        self.messages.last()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}
