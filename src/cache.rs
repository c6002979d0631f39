//! In-memory result cache with per-entry expiration.
//!
//! Entries are keyed by `keyword_provider` and hold the provider's URL
//! list in rank order. Backed by [`moka`], which drops expired entries on
//! access and evicts by TinyLFU once the capacity is reached.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

/// Maximum number of cached URL lists held by [`MemoryCache::new`].
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Builds the cache key for a keyword and provider.
pub fn cache_key(keyword: &str, provider: &str) -> String {
    format!("{}_{}", keyword, provider)
}

/// Store of previously fetched result lists.
///
/// Implementations must be safe to share across concurrent scans.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Returns the cached URLs for `key`, or an empty vector if absent or expired.
    async fn get(&self, key: &str) -> Vec<String>;

    /// Stores `urls` under `key`, expiring `ttl` from now. Replaces any existing entry.
    async fn set(&self, key: &str, urls: Vec<String>, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CachedUrls {
    urls: Vec<String>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedUrls> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrls,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedUrls,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-local [`ResultCache`].
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, CachedUrls>,
}

impl MemoryCache {
    /// Creates a cache holding up to 10 000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache bounded to `max_entries`.
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Vec<String> {
        self.entries
            .get(key)
            .await
            .map(|entry| entry.urls)
            .unwrap_or_default()
    }

    async fn set(&self, key: &str, urls: Vec<String>, ttl: Duration) {
        self.entries
            .insert(key.to_string(), CachedUrls { urls, ttl })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cache_key_joins_keyword_and_provider() {
        assert_eq!(cache_key("e-settlement", "Google"), "e-settlement_Google");
        assert_eq!(cache_key("rust lang", "Bing"), "rust lang_Bing");
    }

    #[test]
    fn cache_key_differs_per_provider() {
        assert_ne!(cache_key("test", "Google"), cache_key("test", "Bing"));
    }

    #[tokio::test]
    async fn cache_miss_returns_empty() {
        let cache = MemoryCache::new();
        assert!(cache.get("missing_Google").await.is_empty());
    }

    #[tokio::test]
    async fn cache_insert_and_retrieve_preserves_order() {
        let cache = MemoryCache::new();
        let stored = urls(&["https://a.com/", "https://b.com/", "https://c.com/"]);
        cache
            .set("test_Google", stored.clone(), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("test_Google").await, stored);
    }

    #[tokio::test]
    async fn overwrite_same_key_updates_value() {
        let cache = MemoryCache::new();
        cache
            .set("test_Bing", urls(&["https://old.com/"]), Duration::from_secs(60))
            .await;
        cache
            .set("test_Bing", urls(&["https://new.com/"]), Duration::from_secs(60))
            .await;
        assert_eq!(cache.get("test_Bing").await, urls(&["https://new.com/"]));
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = MemoryCache::new();
        cache
            .set("short_Google", urls(&["https://a.com/"]), Duration::from_millis(50))
            .await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.get("short_Google").await.is_empty());
    }

    #[tokio::test]
    async fn ttl_is_tracked_per_entry() {
        let cache = MemoryCache::new();
        cache
            .set("short_Google", urls(&["https://a.com/"]), Duration::from_millis(50))
            .await;
        cache
            .set("long_Google", urls(&["https://b.com/"]), Duration::from_secs(60))
            .await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(cache.get("short_Google").await.is_empty());
        assert_eq!(cache.get("long_Google").await, urls(&["https://b.com/"]));
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_interfere() {
        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let key = cache_key("concurrent", &format!("P{}", i));
                cache
                    .set(&key, vec![format!("https://{}.com/", i)], Duration::from_secs(60))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        for i in 0..16 {
            let key = cache_key("concurrent", &format!("P{}", i));
            assert_eq!(cache.get(&key).await, vec![format!("https://{}.com/", i)]);
        }
    }

    #[test]
    fn cache_usable_as_trait_object_outside_runtime() {
        let cache: Arc<dyn ResultCache> = Arc::new(MemoryCache::default());
        tokio_test::block_on(async {
            cache
                .set("sync_Google", urls(&["https://a.com/"]), Duration::from_secs(60))
                .await;
            assert_eq!(cache.get("sync_Google").await, urls(&["https://a.com/"]));
        });
    }
}
