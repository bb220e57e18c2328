use lingua::{Language, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes supported by the TTS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    /// Human-readable language name
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageCode::English => "English",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::French => "French",
            LanguageCode::German => "German",
            LanguageCode::Italian => "Italian",
            LanguageCode::Portuguese => "Portuguese",
        }
    }

    /// All supported languages, in display order
    pub fn all() -> &'static [LanguageCode] {
        &[
            LanguageCode::English,
            LanguageCode::Spanish,
            LanguageCode::French,
            LanguageCode::German,
            LanguageCode::Italian,
            LanguageCode::Portuguese,
        ]
    }

    /// Parse an ISO 639-1 code
    pub fn parse(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(LanguageCode::English),
            "es" => Some(LanguageCode::Spanish),
            "fr" => Some(LanguageCode::French),
            "de" => Some(LanguageCode::German),
            "it" => Some(LanguageCode::Italian),
            "pt" => Some(LanguageCode::Portuguese),
            _ => None,
        }
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::English => LanguageCode::English,
            Language::Spanish => LanguageCode::Spanish,
            Language::French => LanguageCode::French,
            Language::German => LanguageCode::German,
            Language::Italian => LanguageCode::Italian,
            Language::Portuguese => LanguageCode::Portuguese,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the language of the given text
/// Returns LanguageCode or defaults to English
pub fn detect_language(text: &str) -> LanguageCode {
    // Build detector with our supported languages
    let languages = vec![
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
    ];

    let detector = LanguageDetectorBuilder::from_languages(&languages).build();

    if let Some(language) = detector.detect_language_of(text) {
        LanguageCode::from_lingua(language)
    } else {
        tracing::warn!("Could not detect language, falling back to English");
        LanguageCode::English
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(LanguageCode::parse("en"), Some(LanguageCode::English));
        assert_eq!(LanguageCode::parse("PT"), Some(LanguageCode::Portuguese));
        assert_eq!(LanguageCode::parse("zz"), None);
    }

    #[test]
    fn test_display_matches_iso_code() {
        for lang in LanguageCode::all() {
            assert_eq!(lang.to_string(), lang.as_str());
            assert_eq!(LanguageCode::parse(lang.as_str()), Some(*lang));
        }
    }

    #[test]
    fn test_detect_language_english() {
        let text = "This is a test in English. The quick brown fox jumps over the lazy dog.";
        assert_eq!(detect_language(text), LanguageCode::English);
    }

    #[test]
    fn test_detect_language_spanish() {
        let text =
            "Esto es una prueba en español. El rápido zorro marrón salta sobre el perro perezoso.";
        assert_eq!(detect_language(text), LanguageCode::Spanish);
    }

    #[test]
    fn test_detect_language_french() {
        let text = "Ceci est un test en français. Le rapide renard brun saute par-dessus le chien paresseux.";
        assert_eq!(detect_language(text), LanguageCode::French);
    }

    #[test]
    fn test_detect_language_german() {
        let text = "Dies ist ein Test auf Deutsch. Der schnelle braune Fuchs springt über den faulen Hund.";
        assert_eq!(detect_language(text), LanguageCode::German);
    }
}
