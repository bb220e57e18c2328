use axum::Json;
use serde::Serialize;

use crate::domain::tts::LanguageCode;

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

/// GET /api/languages - Languages the TTS providers can speak
pub async fn languages() -> Json<LanguagesResponse> {
    let languages = LanguageCode::all()
        .iter()
        .map(|lang| LanguageInfo {
            code: lang.as_str(),
            name: lang.display_name(),
        })
        .collect();

    Json(LanguagesResponse { languages })
}
