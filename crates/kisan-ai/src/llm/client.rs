//! Upstream wire types

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::stream::{Message, Role};

/// Role as understood by the upstream API, which also accepts `system`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Chat message sent upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        };
        Self {
            role,
            content: message.content.clone(),
        }
    }
}

/// Prepend the language's system prompt to the caller's conversation.
///
/// Caller messages are passed through in order and unchanged.
pub fn build_messages(language: Language, conversation: &[Message]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(ChatMessage::system(language.system_prompt()));
    messages.extend(conversation.iter().map(ChatMessage::from));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_comes_first() {
        let conversation = vec![Message::user("hello"), Message::assistant("namaste")];
        let messages = build_messages(Language::Tamil, &conversation);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], ChatMessage::system(Language::Tamil.system_prompt()));
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].content, "namaste");
    }

    #[test]
    fn empty_conversation_yields_only_the_system_message() {
        let messages = build_messages(Language::Hindi, &[]);
        assert_eq!(messages, vec![ChatMessage::system(Language::Hindi.system_prompt())]);
    }

    #[test]
    fn system_role_serializes_lowercase() {
        let value = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(value["role"], "system");
    }
}
