use crate::document::Document;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

const CACHE_KEY_PREFIX: &str = "web-scraper-cache:";

/// Key/value cache of scraped documents, keyed by [`cache_key`]
///
/// No expiry is implied; implementations decide their own eviction.
#[async_trait]
pub trait DocumentCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Document>;
    async fn set(&self, key: &str, document: &Document);
}

/// Builds the cache key for a source URL: the URL with a leading `www.` host label removed
///
/// # Examples
///
/// ```
/// use sumi_harvest::collab::cache_key;
///
/// assert_eq!(
///     cache_key("https://www.example.gov/a"),
///     cache_key("https://example.gov/a")
/// );
/// ```
pub fn cache_key(url: &str) -> String {
    let stripped = match url.split_once("://") {
        Some((scheme, rest)) => format!("{}://{}", scheme, rest.strip_prefix("www.").unwrap_or(rest)),
        None => url.strip_prefix("www.").unwrap_or(url).to_string(),
    };
    format!("{}{}", CACHE_KEY_PREFIX, stripped)
}

/// Cache that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl DocumentCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<Document> {
        None
    }

    async fn set(&self, _key: &str, _document: &Document) {}
}

/// In-process LRU cache
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Document>>,
}

impl MemoryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl DocumentCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Document> {
        let mut guard = self.entries.lock().await;
        guard.get(key).cloned()
    }

    async fn set(&self, key: &str, document: &Document) {
        let mut guard = self.entries.lock().await;
        guard.put(key.to_string(), document.clone());
    }
}
