use chrono::{DateTime, Utc};
use serde::Serialize;

/// Attribution metadata extracted from the source page (or synthesized
/// for pasted text)
#[derive(Debug, Clone, Serialize)]
pub struct ArticleMetadata {
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Sanitized article content plus its attribution metadata
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub content: String,
    pub metadata: ArticleMetadata,
    pub fetched_at: DateTime<Utc>,
}
