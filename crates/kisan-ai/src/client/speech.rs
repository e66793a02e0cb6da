use crate::language::Language;

/// Voice input and output, when the host has it.
///
/// Implementations use [`Language::speech_tag`] to pick the recognizer and
/// voice.
pub trait SpeechCapability: Send + Sync {
    fn is_available(&self) -> bool;

    /// Capture one utterance. `None` when nothing was recognized.
    fn start_listening(&self, language: Language) -> Option<String>;

    fn speak(&self, text: &str, language: Language);
}

/// Host without speech support: listening hears nothing, speaking is silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeech;

impl SpeechCapability for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start_listening(&self, language: Language) -> Option<String> {
        tracing::debug!(tag = language.speech_tag(), "Speech recognition unavailable");
        None
    }

    fn speak(&self, _text: &str, language: Language) {
        tracing::debug!(tag = language.speech_tag(), "Speech synthesis unavailable");
    }
}
