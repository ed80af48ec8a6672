//! In-process lookup cache backed by moka.

use super::service::{cache_key, CacheResult, LookupCache};
use crate::domain::entities::LinkRecord;
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cached record plus the TTL requested for it at insertion time.
#[derive(Clone)]
struct CacheEntry {
    record: LinkRecord,
    ttl_hint: Option<Duration>,
}

/// Per-entry expiry that never outlives the record's own `expires_at`.
struct RecordExpiry {
    default_ttl: Duration,
}

impl Expiry<String, CacheEntry> for RecordExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        let base = entry.ttl_hint.unwrap_or(self.default_ttl);
        match entry.record.expires_at {
            Some(expires_at) => {
                let now = chrono::Utc::now();
                if expires_at <= now {
                    Some(Duration::ZERO)
                } else {
                    let remaining = (expires_at - now).num_seconds().max(1) as u64;
                    Some(Duration::from_secs(remaining).min(base))
                }
            }
            None => Some(base),
        }
    }
}

/// Single-process cache for resolved link records.
///
/// Useful for embedded deployments and tests where Redis is unavailable.
/// An entry lives for the shorter of the per-call `ttl_seconds` hint (the
/// construction-time default when absent) and the record's own expiry.
pub struct MemoryCache {
    inner: Cache<String, CacheEntry>,
}

impl MemoryCache {
    /// Creates a memory cache bounded by capacity and TTL.
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let default_ttl = Duration::from_secs(default_ttl_seconds);
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(RecordExpiry { default_ttl })
            .build();

        debug!(
            "MemoryCache initialized (capacity: {}, default TTL: {}s)",
            max_capacity, default_ttl_seconds
        );
        Self { inner }
    }
}

#[async_trait]
impl LookupCache for MemoryCache {
    async fn get(&self, tenant_id: &str, code: &str) -> CacheResult<Option<LinkRecord>> {
        let key = cache_key("", tenant_id, code);
        Ok(self.inner.get(&key).await.map(|e| e.record))
    }

    async fn put(
        &self,
        tenant_id: &str,
        code: &str,
        record: &LinkRecord,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = cache_key("", tenant_id, code);
        let entry = CacheEntry {
            record: record.clone(),
            ttl_hint: ttl_seconds.map(Duration::from_secs),
        };
        self.inner.insert(key, entry).await;
        Ok(())
    }

    async fn invalidate(&self, tenant_id: &str, code: &str) -> CacheResult<()> {
        let key = cache_key("", tenant_id, code);
        self.inner.invalidate(&key).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(code: &str) -> LinkRecord {
        LinkRecord {
            id: 1,
            tenant_id: "1".to_string(),
            code: code.to_string(),
            canonical_url: "https://example.com/".to_string(),
            original_url: "https://example.com".to_string(),
            active: true,
            created_at: Utc::now(),
            expires_at: None,
            deleted_at: None,
            click_count: 0,
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = MemoryCache::new(100, 60);
        cache.put("1", "abc", &record("abc"), None).await.unwrap();

        let hit = cache.get("1", "abc").await.unwrap();
        assert_eq!(hit.unwrap().code, "abc");
    }

    #[tokio::test]
    async fn test_miss_for_unknown_code() {
        let cache = MemoryCache::new(100, 60);
        assert!(cache.get("1", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tenant_keys_are_isolated() {
        let cache = MemoryCache::new(100, 60);
        cache.put("1", "abc", &record("abc"), None).await.unwrap();

        assert!(cache.get("2", "abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_hint_expires_immediately() {
        let cache = MemoryCache::new(100, 60);
        cache.put("1", "abc", &record("abc"), Some(0)).await.unwrap();

        assert!(cache.get("1", "abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MemoryCache::new(100, 60);
        cache.put("1", "abc", &record("abc"), None).await.unwrap();
        cache.invalidate("1", "abc").await.unwrap();

        assert!(cache.get("1", "abc").await.unwrap().is_none());
    }
}
