//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, LookupCache};
use crate::domain::entities::LinkRecord;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is unavailable or caching is explicitly disabled; every
/// resolution falls through to the store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupCache for NullCache {
    async fn get(&self, _tenant_id: &str, _code: &str) -> CacheResult<Option<LinkRecord>> {
        Ok(None)
    }

    async fn put(
        &self,
        _tenant_id: &str,
        _code: &str,
        _record: &LinkRecord,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _tenant_id: &str, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
