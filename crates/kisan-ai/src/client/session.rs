use tokio_util::sync::CancellationToken;

use crate::client::chat::{ChatClient, ReplyOutcome};
use crate::error::Result;
use crate::language::Language;
use crate::stream::{Conversation, Message};

/// State owned by one chat view.
pub struct ChatSession {
    client: ChatClient,
    conversation: Conversation,
    language: Language,
    loading: bool,
}

// Clears the loading flag however the send ends, including when the future is dropped.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl ChatSession {
    pub fn new(client: ChatClient, language: Language) -> Self {
        Self {
            client,
            conversation: Conversation::new(),
            language,
            loading: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Quick questions for the current language.
    pub fn quick_questions(&self) -> &'static [&'static str] {
        self.language.quick_questions()
    }

    /// Append a user turn and stream the reply.
    ///
    /// Blank input is ignored and returns `Ok(None)`.
    pub async fn send<F>(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
        on_update: F,
    ) -> Result<Option<ReplyOutcome>>
    where
        F: FnMut(&str, &Message),
    {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.conversation.push_user(text);
        let _loading = LoadingGuard::new(&mut self.loading);
        self.client
            .stream_reply(&mut self.conversation, self.language, cancel, on_update)
            .await
            .map(Some)
    }
}
