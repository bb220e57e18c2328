use crate::domain::article::Article;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// TTL-bounded cache for fetched articles, keyed by a hash of the
/// source URL. Disabled entirely by configuration; a disabled cache
/// never hits.
pub struct ArticleCache {
    inner: Option<Cache<String, Article>>,
}

impl ArticleCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        let inner = enabled.then(|| {
            Cache::builder()
                .max_capacity(100)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    fn cache_key(url: &str) -> String {
        format!("{:x}", Sha256::digest(url.as_bytes()))
    }

    pub async fn get(&self, url: &str) -> Option<Article> {
        self.inner.as_ref()?.get(&Self::cache_key(url)).await
    }

    pub async fn insert(&self, url: &str, article: Article) {
        if let Some(cache) = &self.inner {
            cache.insert(Self::cache_key(url), article).await;
        }
    }
}
