//! Supported reply languages and their system prompts.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A language the assistant can answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
    Tamil,
    Kannada,
}

/// Public description of a language, as listed to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub label: &'static str,
    pub flag: &'static str,
    pub speech_tag: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown language code '{}' (expected one of: en, hi, te, ta, kn)",
            self.0
        )
    }
}

impl std::error::Error for UnknownLanguage {}

const ENGLISH_PROMPT: &str = "You are Kisan Mitra, a helpful AI farming assistant for Indian farmers. Answer questions about crop diseases, fertilizers, market prices, weather advice, and government schemes. Keep answers practical, concise, and farmer-friendly. Reply in English.";

const HINDI_PROMPT: &str = "आप किसान मित्र हैं, भारतीय किसानों के लिए एक सहायक AI कृषि सहायक। फसल रोगों, उर्वरकों, बाज़ार मूल्यों, मौसम सलाह और सरकारी योजनाओं के बारे में प्रश्नों का उत्तर दें। उत्तर व्यावहारिक, संक्षिप्त और किसान-अनुकूल रखें। हिंदी में उत्तर दें।";

const TELUGU_PROMPT: &str = "మీరు కిసాన్ మిత్ర, భారతీయ రైతులకు సహాయకారి AI వ్యవసాయ సహాయకుడు. పంట వ్యాధులు, ఎరువులు, మార్కెట్ ధరలు, వాతావరణ సలహా మరియు ప్రభుత్వ పథకాల గురించి ప్రశ్నలకు సమాధానం ఇవ్వండి. తెలుగులో సమాధానం ఇవ్వండి.";

const TAMIL_PROMPT: &str = "நீங்கள் கிசான் மித்ரா, இந்திய விவசாயிகளுக்கான AI வேளாண் உதவியாளர். பயிர் நோய்கள், உரங்கள், சந்தை விலைகள், வானிலை ஆலோசனை மற்றும் அரசு திட்டங்கள் பற்றிய கேள்விகளுக்கு பதிலளிக்கவும். தமிழில் பதிலளிக்கவும்.";

const KANNADA_PROMPT: &str = "ನೀವು ಕಿಸಾನ್ ಮಿತ್ರ, ಭಾರತೀಯ ರೈತರಿಗೆ AI ಕೃಷಿ ಸಹಾಯಕ. ಬೆಳೆ ರೋಗಗಳು, ರಸಗೊಬ್ಬರಗಳು, ಮಾರುಕಟ್ಟೆ ಬೆಲೆಗಳು, ಹವಾಮಾನ ಸಲಹೆ ಮತ್ತು ಸರ್ಕಾರಿ ಯೋಜನೆಗಳ ಬಗ್ಗೆ ಪ್ರಶ್ನೆಗಳಿಗೆ ಉತ್ತರಿಸಿ. ಕನ್ನಡದಲ್ಲಿ ಉತ್ತರಿಸಿ.";

impl Language {
    /// All languages in display order.
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hindi,
        Language::Telugu,
        Language::Tamil,
        Language::Kannada,
    ];

    /// Exact, case-sensitive lookup of a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Language::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Resolve an optional wire code, falling back to English for anything
    /// missing or not an exact code. `"HI"` and `" hi "` are not codes.
    pub fn resolve(code: Option<&str>) -> Self {
        code.and_then(Language::from_code).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Tamil => "ta",
            Language::Kannada => "kn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Telugu => "తెలుగు",
            Language::Tamil => "தமிழ்",
            Language::Kannada => "ಕನ್ನಡ",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Language::English => "🇬🇧",
            _ => "🇮🇳",
        }
    }

    /// BCP-47 tag used for speech recognition and synthesis.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Telugu => "te-IN",
            Language::Tamil => "ta-IN",
            Language::Kannada => "kn-IN",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Language::English => ENGLISH_PROMPT,
            Language::Hindi => HINDI_PROMPT,
            Language::Telugu => TELUGU_PROMPT,
            Language::Tamil => TAMIL_PROMPT,
            Language::Kannada => KANNADA_PROMPT,
        }
    }

    /// Starter questions offered on an empty conversation.
    pub fn quick_questions(self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "How to identify crop disease?",
                "Best fertilizer for wheat?",
                "Today's market price for rice?",
                "PM Kisan scheme details?",
                "Weather tips for sowing?",
            ],
            Language::Hindi => &[
                "फसल की बीमारी कैसे पहचानें?",
                "गेहूं के लिए सबसे अच्छा उर्वरक?",
                "आज चावल का बाज़ार भाव?",
                "PM किसान योजना की जानकारी?",
                "बुवाई के लिए मौसम की सलाह?",
            ],
            Language::Telugu => &[
                "పంట వ్యాధిని ఎలా గుర్తించాలి?",
                "గోధుమకు ఉత్తమ ఎరువు?",
                "బియ్యం ధర ఈరోజు?",
                "PM కిసాన్ పథకం వివరాలు?",
                "విత్తనానికి వాతావరణ సలహా?",
            ],
            Language::Tamil => &[
                "பயிர் நோயை எவ்வாறு கண்டறிவது?",
                "கோதுமைக்கு சிறந்த உரம்?",
                "அரிசி இன்றைய சந்தை விலை?",
                "PM கிசான் திட்ட விவரங்கள்?",
                "விதைப்புக்கான வானிலை ஆலோசனை?",
            ],
            Language::Kannada => &[
                "ಬೆಳೆ ರೋಗವನ್ನು ಹೇಗೆ ಗುರುತಿಸುವುದು?",
                "ಗೋಧಿಗೆ ಉತ್ತಮ ರಸಗೊಬ್ಬರ?",
                "ಅಕ್ಕಿ ಇಂದಿನ ಮಾರುಕಟ್ಟೆ ಬೆಲೆ?",
                "PM ಕಿಸಾನ್ ಯೋಜನೆ ವಿವರ?",
                "ಬಿತ್ತನೆಗೆ ಹವಾಮಾನ ಸಲಹೆ?",
            ],
        }
    }

    pub fn info(self) -> LanguageInfo {
        LanguageInfo {
            code: self.code(),
            label: self.label(),
            flag: self.flag(),
            speech_tag: self.speech_tag(),
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
