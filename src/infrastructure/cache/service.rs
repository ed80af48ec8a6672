//! Lookup cache trait and error types.

use crate::domain::entities::LinkRecord;
use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-side accelerator for resolution, keyed by `(tenant_id, code)`.
///
/// The cache is an optimization, never the source of truth: implementations
/// must fail open (errors degrade to a store lookup), and any collaborator
/// that deactivates or deletes a record must call [`LookupCache::invalidate`]
/// for its key — that invalidation contract is what keeps cached entries from
/// resolving to a wrong URL.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process moka cache
/// - [`crate::infrastructure::cache::NullCache`] - no-op for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupCache: Send + Sync {
    /// Retrieves the cached record for a code.
    ///
    /// Returns `Ok(None)` on miss; production implementations also return
    /// `Ok(None)` on backend errors after logging them.
    async fn get(&self, tenant_id: &str, code: &str) -> CacheResult<Option<LinkRecord>>;

    /// Stores a record with a bounded TTL.
    ///
    /// `ttl_seconds = None` applies the implementation's default. Errors are
    /// logged and swallowed so a cache outage never disrupts resolution.
    async fn put(
        &self,
        tenant_id: &str,
        code: &str,
        record: &LinkRecord,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached entry.
    ///
    /// Must be called by any collaborator that deactivates or deletes the
    /// underlying record.
    async fn invalidate(&self, tenant_id: &str, code: &str) -> CacheResult<()>;

    /// Reports whether the cache backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Builds the flat cache key for a `(tenant, code)` pair.
pub(crate) fn cache_key(prefix: &str, tenant_id: &str, code: &str) -> String {
    format!("{}{}:{}", prefix, tenant_id, code)
}
