use super::model::ArticleMetadata;

/// Build the human-readable attribution block shown alongside a
/// generated podcast. Fields that were not extracted are left out.
pub fn generate_attribution(metadata: &ArticleMetadata) -> String {
    let mut parts = Vec::new();

    if let Some(title) = &metadata.title {
        parts.push(format!("Title: {title}"));
    }
    if let Some(author) = &metadata.author {
        parts.push(format!("Author: {author}"));
    }
    if let Some(date) = &metadata.date {
        parts.push(format!("Date: {date}"));
    }
    if !metadata.url.is_empty() {
        parts.push(format!("Source: {}", metadata.url));
    }

    parts.push("Content used with attribution for educational purposes.".to_string());

    parts.join("\n")
}
