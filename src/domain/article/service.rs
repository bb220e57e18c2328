use super::error::ArticleServiceError;
use super::model::{Article, ArticleMetadata};
use crate::infrastructure::cache::ArticleCache;
use crate::infrastructure::fetcher::BlogFetcher;
use chrono::Utc;
use std::sync::Arc;

const TRUNCATION_MARKER: &str = " [Content truncated]";
const EXCERPT_MARKER: &str = " [Excerpt limited; full article available at the source]";

/// Excerpt limiting is off by default; when enabled, preview and
/// synthesis both see at most `max_chars` characters of the article
#[derive(Debug, Clone)]
pub struct ExcerptLimits {
    pub enabled: bool,
    pub max_chars: usize,
}

/// Content-source collaborator: turns a URL or pasted text into a
/// sanitized `Article` with attribution metadata. Fetched pages are
/// cached keyed by a hash of the URL.
pub struct ArticleService {
    fetcher: Arc<BlogFetcher>,
    cache: Arc<ArticleCache>,
    max_content_chars: usize,
    excerpt_limits: ExcerptLimits,
}

impl ArticleService {
    pub fn new(
        fetcher: Arc<BlogFetcher>,
        cache: Arc<ArticleCache>,
        max_content_chars: usize,
        excerpt_limits: ExcerptLimits,
    ) -> Self {
        Self {
            fetcher,
            cache,
            max_content_chars,
            excerpt_limits,
        }
    }

    /// Resolve an article from whichever source the caller supplied
    pub async fn resolve(
        &self,
        url: Option<&str>,
        text: Option<&str>,
    ) -> Result<Article, ArticleServiceError> {
        match (url, text) {
            (Some(url), None) => self.fetch(url).await,
            (None, Some(text)) => self.from_text(text, None),
            _ => Err(ArticleServiceError::AmbiguousSource),
        }
    }

    /// Fetch a blog post and extract its readable content and metadata
    pub async fn fetch(&self, url: &str) -> Result<Article, ArticleServiceError> {
        if !is_valid_url(url) {
            return Err(ArticleServiceError::InvalidUrl(url.to_string()));
        }

        if let Some(article) = self.cache.get(url).await {
            tracing::info!(url = %url, "Article cache hit");
            return Ok(article);
        }

        if !self.fetcher.robots_allowed(url).await {
            return Err(ArticleServiceError::DisallowedByRobots(url.to_string()));
        }

        let html = self
            .fetcher
            .fetch_page(url)
            .await
            .map_err(ArticleServiceError::Fetch)?;

        let metadata = extract_metadata(&html, url);
        let content = extract_content(&html);
        if content.is_empty() {
            return Err(ArticleServiceError::NoContent);
        }

        tracing::info!(
            url = %url,
            content_length = content.len(),
            title = ?metadata.title,
            "Article extracted"
        );

        let article = Article {
            content: self.truncate_content(content),
            metadata,
            fetched_at: Utc::now(),
        };

        self.cache.insert(url, article.clone()).await;
        Ok(article)
    }

    /// Wrap pasted text in an article with synthetic attribution
    pub fn from_text(
        &self,
        text: &str,
        url: Option<&str>,
    ) -> Result<Article, ArticleServiceError> {
        let content = sanitize(text);
        if content.is_empty() {
            return Err(ArticleServiceError::NoContent);
        }

        let metadata = ArticleMetadata {
            url: url.unwrap_or("Pasted Content").to_string(),
            title: Some("User Provided Content".to_string()),
            author: Some("User".to_string()),
            date: None,
            description: None,
            tags: Vec::new(),
        };

        Ok(Article {
            content: self.truncate_content(content),
            metadata,
            fetched_at: Utc::now(),
        })
    }

    /// Cap the article at the configured excerpt length, when enabled
    pub fn apply_excerpt_limits(&self, content: &str) -> String {
        if !self.excerpt_limits.enabled {
            return content.to_string();
        }
        if content.chars().count() <= self.excerpt_limits.max_chars {
            return content.to_string();
        }
        let truncated: String = content.chars().take(self.excerpt_limits.max_chars).collect();
        format!("{}{}", truncated.trim_end(), EXCERPT_MARKER)
    }

    fn truncate_content(&self, content: String) -> String {
        if content.chars().count() <= self.max_content_chars {
            return content;
        }
        let truncated: String = content.chars().take(self.max_content_chars).collect();
        format!("{}{}", truncated.trim_end(), TRUNCATION_MARKER)
    }
}

fn is_valid_url(url: &str) -> bool {
    let pattern = regex::Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
    pattern.is_match(url)
}

/// Collapse whitespace, strip control characters, trim
fn sanitize(text: &str) -> String {
    let whitespace = regex::Regex::new(r"\s+").unwrap();
    let collapsed = whitespace.replace_all(text, " ");
    let control = regex::Regex::new(r"[\x00-\x1f\x7f-\x{9f}]").unwrap();
    control.replace_all(&collapsed, "").trim().to_string()
}

/// Pull attribution metadata out of the page head. Regex over the raw
/// HTML is enough here; the fields are all attribute-delimited.
fn extract_metadata(html: &str, url: &str) -> ArticleMetadata {
    let title = meta_content(html, "property", "og:title")
        .or_else(|| tag_text(html, "title"))
        .or_else(|| tag_text(html, "h1"));
    let author = meta_content(html, "name", "author")
        .or_else(|| meta_content(html, "property", "article:author"));
    let date = meta_content(html, "property", "article:published_time")
        .or_else(|| attr_value(html, "time", "datetime"));
    let description = meta_content(html, "name", "description")
        .or_else(|| meta_content(html, "property", "og:description"));

    ArticleMetadata {
        url: url.to_string(),
        title,
        author,
        date,
        description,
        tags: rel_tag_texts(html),
    }
}

/// Extract the readable article text: drop chrome elements, convert to
/// plain text, strip URLs, and keep only lines long enough to be prose.
fn extract_content(html: &str) -> String {
    let mut cleaned = html.to_string();
    // "header" before "head": the head pattern would otherwise swallow
    // an opening <header> tag
    for tag in ["script", "style", "nav", "header", "head", "footer", "aside"] {
        let block = regex::Regex::new(&format!(r"(?is)<{tag}[^>]*>.*?</{tag}>")).unwrap();
        cleaned = block.replace_all(&cleaned, " ").into_owned();
    }

    let text = html2text::from_read(cleaned.as_bytes(), usize::MAX);

    let url_pattern = regex::Regex::new(r"https?://[^\s]+").unwrap();
    let without_urls = url_pattern.replace_all(&text, "");

    let prose: Vec<&str> = without_urls
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 10)
        .collect();

    sanitize(&prose.join(" "))
}

fn meta_content(html: &str, attr: &str, name: &str) -> Option<String> {
    // Attribute order varies between sites, so probe both
    let forward = regex::Regex::new(&format!(
        r#"(?i)<meta[^>]*{attr}=["']{name}["'][^>]*content=["']([^"']*)["']"#
    ))
    .ok()?;
    if let Some(captures) = forward.captures(html) {
        if let Some(value) = nonempty(&captures[1]) {
            return Some(value);
        }
    }

    let reversed = regex::Regex::new(&format!(
        r#"(?i)<meta[^>]*content=["']([^"']*)["'][^>]*{attr}=["']{name}["']"#
    ))
    .ok()?;
    reversed
        .captures(html)
        .and_then(|captures| nonempty(&captures[1]))
}

fn tag_text(html: &str, tag: &str) -> Option<String> {
    let pattern = regex::Regex::new(&format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>")).ok()?;
    pattern
        .captures(html)
        .and_then(|captures| nonempty(&strip_tags(&captures[1])))
}

fn attr_value(html: &str, tag: &str, attr: &str) -> Option<String> {
    let pattern =
        regex::Regex::new(&format!(r#"(?i)<{tag}[^>]*{attr}=["']([^"']+)["']"#)).ok()?;
    pattern
        .captures(html)
        .and_then(|captures| nonempty(&captures[1]))
}

fn rel_tag_texts(html: &str) -> Vec<String> {
    let pattern = regex::Regex::new(r#"(?is)<a[^>]*rel=["']tag["'][^>]*>(.*?)</a>"#).unwrap();
    pattern
        .captures_iter(html)
        .filter_map(|captures| nonempty(&strip_tags(&captures[1])))
        .collect()
}

fn strip_tags(fragment: &str) -> String {
    let tags = regex::Regex::new(r"<[^>]+>").unwrap();
    tags.replace_all(fragment, " ").to_string()
}

fn nonempty(value: &str) -> Option<String> {
    let trimmed = sanitize(value);
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html>
            <head>
                <title>Fallback Title | Some Blog</title>
                <meta property="og:title" content="How Tech Shapes Markets">
                <meta name="author" content="Jane Doe">
                <meta name="description" content="A look at market shifts.">
                <meta property="article:published_time" content="2024-03-01T10:00:00Z">
            </head>
            <body>
                <nav><a href="/">Home</a><a href="/blog">Blog</a></nav>
                <article>
                    <h1>How Tech Shapes Markets</h1>
                    <p>Technology continues to reshape how markets operate around the world.</p>
                    <p>Visit https://example.com/more for details about these long-term changes.</p>
                    <a rel="tag">strategy</a>
                    <a rel="tag">markets</a>
                </article>
                <footer>Copyright 2024 Some Blog</footer>
            </body>
        </html>
    "#;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://www.example.com/blog/post"));
        assert!(is_valid_url("http://localhost:8080/page"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_extract_metadata_prefers_og_title() {
        let metadata = extract_metadata(PAGE, "https://example.com/post");
        assert_eq!(metadata.title.as_deref(), Some("How Tech Shapes Markets"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
        assert_eq!(metadata.date.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(metadata.description.as_deref(), Some("A look at market shifts."));
        assert_eq!(metadata.tags, vec!["strategy", "markets"]);
    }

    #[test]
    fn test_extract_metadata_falls_back_to_title_tag() {
        let html = "<html><head><title> Bare Title </title></head><body></body></html>";
        let metadata = extract_metadata(html, "https://example.com");
        assert_eq!(metadata.title.as_deref(), Some("Bare Title"));
        assert!(metadata.author.is_none());
    }

    #[test]
    fn test_extract_content_drops_chrome_and_urls() {
        let content = extract_content(PAGE);
        assert!(content.contains("Technology continues to reshape"));
        assert!(!content.contains("https://"));
        assert!(!content.contains("Copyright"));
        assert!(!content.contains("<"));
    }

    #[test]
    fn test_sanitize_collapses_whitespace_and_controls() {
        assert_eq!(sanitize("a\n\n  b\tc"), "a b c");
        assert_eq!(sanitize("x\u{0000}y"), "xy");
        assert_eq!(sanitize("   "), "");
    }

    fn service(excerpt_limits: ExcerptLimits, max_content_chars: usize) -> ArticleService {
        ArticleService::new(
            Arc::new(BlogFetcher::with_defaults()),
            Arc::new(ArticleCache::new(false, std::time::Duration::from_secs(60))),
            max_content_chars,
            excerpt_limits,
        )
    }

    fn no_limits() -> ExcerptLimits {
        ExcerptLimits {
            enabled: false,
            max_chars: 1000,
        }
    }

    #[test]
    fn test_from_text_wraps_pasted_content() {
        let service = service(no_limits(), 50_000);
        let article = service
            .from_text("Some   pasted\ncontent here.", None)
            .unwrap();
        assert_eq!(article.content, "Some pasted content here.");
        assert_eq!(article.metadata.url, "Pasted Content");
        assert_eq!(article.metadata.title.as_deref(), Some("User Provided Content"));
    }

    #[test]
    fn test_from_text_rejects_empty_input() {
        let service = service(no_limits(), 50_000);
        assert!(matches!(
            service.from_text("   \n ", None),
            Err(ArticleServiceError::NoContent)
        ));
    }

    #[test]
    fn test_content_is_truncated_at_limit() {
        let service = service(no_limits(), 100);
        let text = "word ".repeat(100);
        let article = service.from_text(&text, None).unwrap();
        assert!(article.content.ends_with(TRUNCATION_MARKER));
        assert!(article.content.chars().count() <= 100 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_excerpt_limits_disabled_passes_through() {
        let service = service(no_limits(), 50_000);
        let content = "word ".repeat(500);
        assert_eq!(service.apply_excerpt_limits(&content), content);
    }

    #[test]
    fn test_excerpt_limits_enabled_caps_content() {
        let service = service(
            ExcerptLimits {
                enabled: true,
                max_chars: 50,
            },
            50_000,
        );
        let content = "word ".repeat(500);
        let limited = service.apply_excerpt_limits(&content);
        assert!(limited.ends_with(EXCERPT_MARKER));
        assert!(limited.chars().count() < content.chars().count());
    }
}
