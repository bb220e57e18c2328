pub mod language;

pub use language::{detect_language, LanguageCode};
