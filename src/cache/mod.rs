//! Response caching for suggestion fetches
//!
//! Caches successful suggestion responses so that retyping a recent query
//! skips the network entirely. Expiry is checked lazily on read against the
//! tokio clock, which keeps the time-to-live observable under test.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::suggestions::{GeoPoint, Suggestion};

/// A cached suggestion response with its insertion and expiry instants.
#[derive(Debug, Clone)]
struct CacheEntry {
    suggestions: Vec<Suggestion>,
    created_at: Instant,
    expires_at: Instant,
}

/// Cache for suggestion responses, keyed by query, location bucket, and limit.
pub struct ResponseCache {
    cache: Cache<String, Arc<CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache with specified TTL
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();

        Self { cache, ttl }
    }

    /// Get a cached response, dropping it if its TTL has elapsed.
    pub async fn get(&self, key: &str) -> Option<Vec<Suggestion>> {
        let entry = self.cache.get(key).await?;
        let now = Instant::now();
        if now >= entry.expires_at {
            debug!(
                age_secs = now.duration_since(entry.created_at).as_secs(),
                "Dropping expired suggestion cache entry"
            );
            self.cache.invalidate(key).await;
            return None;
        }
        Some(entry.suggestions.clone())
    }

    /// Store a successful response in cache
    pub async fn put(&self, key: String, suggestions: Vec<Suggestion>) {
        let now = Instant::now();
        let entry = CacheEntry {
            suggestions,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.cache.insert(key, Arc::new(entry)).await;
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache size
    pub fn size(&self) -> u64 {
        self.cache.entry_count()
    }
}

/// Generate a cache key for a suggestion fetch.
///
/// The query is normalized so that case and whitespace variants share an
/// entry, and coordinates are bucketed to three decimal places so small GPS
/// drift does not fragment the cache.
pub fn suggest_cache_key(query: &str, location: Option<&GeoPoint>, limit: usize) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(crate::query::normalize(query).as_bytes());
    if let Some(point) = location {
        hasher.update(bucket_coord(point.lat).to_string().as_bytes());
        hasher.update(bucket_coord(point.lng).to_string().as_bytes());
    }
    hasher.update(limit.to_string().as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Bucket a coordinate to three decimal places (roughly 100m of latitude).
fn bucket_coord(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Vec<Suggestion> {
        vec![Suggestion::new(name, name)]
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(3600), 100);
        cache.put("k".to_string(), sample("Lisbon")).await;

        let hit = cache.get("k").await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap()[0].name, "Lisbon");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(3600), 100);
        cache.put("k".to_string(), sample("Lisbon")).await;

        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_size_counts_entries_and_clear_empties() {
        let cache = ResponseCache::new(Duration::from_secs(3600), 100);
        cache.put("a".to_string(), sample("Lisbon")).await;
        cache.put("b".to_string(), sample("Porto")).await;

        // moka defers its bookkeeping; flush it so the count is exact.
        cache.cache.run_pending_tasks().await;
        assert_eq!(cache.size(), 2);

        cache.clear();
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_none());
    }

    #[test]
    fn test_key_normalizes_query() {
        let a = suggest_cache_key("  Beach   Resort ", None, 10);
        let b = suggest_cache_key("beach resort", None, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_buckets_nearby_locations() {
        let here = GeoPoint::new(38.7223, -9.1393);
        let drift = GeoPoint::new(38.72234, -9.13928);
        let elsewhere = GeoPoint::new(41.1579, -8.6291);

        let a = suggest_cache_key("beach", Some(&here), 10);
        let b = suggest_cache_key("beach", Some(&drift), 10);
        let c = suggest_cache_key("beach", Some(&elsewhere), 10);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_key_varies_with_limit() {
        let a = suggest_cache_key("beach", None, 10);
        let b = suggest_cache_key("beach", None, 5);
        assert_ne!(a, b);
    }
}
