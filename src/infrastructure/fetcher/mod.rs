use reqwest::header;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP transport for the article collaborator. Sends a browser-like
/// user agent; some blog hosts reject obvious bots.
pub struct BlogFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl BlogFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(10))
    }

    /// Coarse robots.txt check: only blanket disallows and blog-path
    /// disallows are honored. Errors count as allowed, like a missing
    /// robots.txt.
    pub async fn robots_allowed(&self, url: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            return true;
        };
        let robots_url = format!("{origin}/robots.txt");

        let response = match self
            .client
            .get(&robots_url)
            .timeout(ROBOTS_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            _ => return true,
        };

        let Ok(body) = response.text().await else {
            return true;
        };

        !body.to_lowercase().lines().map(str::trim).any(|line| {
            line == "disallow: /" || line.starts_with("disallow: /blog")
        })
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String, String> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(header::USER_AGENT, USER_AGENT)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        response.text().await.map_err(|e| e.to_string())
    }
}

fn origin_of(url: &str) -> Option<String> {
    let pattern = regex::Regex::new(r"^(https?://[^/\s]+)").unwrap();
    pattern
        .captures(url)
        .map(|captures| captures[1].to_string())
}
