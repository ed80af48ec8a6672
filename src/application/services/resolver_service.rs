//! Cache-accelerated code resolution.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::LinkRecord;
use crate::domain::repositories::LinkStore;
use crate::error::EngineError;
use crate::infrastructure::cache::LookupCache;

/// Read path from short code to link record.
///
/// Cache-aside: the lookup cache is consulted first, the store on a miss,
/// and resolvable records are written back with a bounded TTL. Cache
/// failures degrade to store lookups — the cache is never the source of
/// truth, and cached hits are re-checked against the record's own state so
/// a deactivated or expired record never redirects from cache.
pub struct ResolverService<S: LinkStore, C: LookupCache> {
    store: Arc<S>,
    cache: Arc<C>,
    cache_ttl_seconds: u64,
}

impl<S, C> ResolverService<S, C>
where
    S: LinkStore + 'static,
    C: LookupCache + 'static,
{
    /// Creates a resolver over a store and cache.
    pub fn new(store: Arc<S>, cache: Arc<C>, cache_ttl_seconds: u64) -> Self {
        Self {
            store,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Resolves a short code to its link record.
    ///
    /// Never mutates the record; click counting is a collaborator's concern
    /// and happens after this call returns.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] when no live record matches,
    /// [`EngineError::Inactive`] for deactivated records,
    /// [`EngineError::Expired`] past the record's expiry, and
    /// [`EngineError::Storage`] for backend failures.
    pub async fn resolve(&self, tenant_id: &str, code: &str) -> Result<LinkRecord, EngineError> {
        match self.cache.get(tenant_id, code).await {
            // Tenant ids are opaque, so a flat cache key can alias across
            // tenants; a hit only counts when the record matches the
            // requested key exactly.
            Ok(Some(cached)) if cached.tenant_id == tenant_id && cached.code == code => {
                debug!(tenant_id, code, "cache hit");
                return gate(cached);
            }
            Ok(Some(_)) => {
                warn!(tenant_id, code, "cached record belongs to a different key, ignoring");
            }
            Ok(None) => {
                debug!(tenant_id, code, "cache miss");
            }
            Err(e) => {
                error!(tenant_id, code, "cache error, falling back to store: {e}");
            }
        }

        let record = self
            .store
            .find_by_code(tenant_id, code)
            .await?
            .ok_or(EngineError::NotFound)?;

        let record = gate(record)?;

        // Write-back off the request path; a failed put only costs the next
        // lookup a store round-trip.
        let cache = Arc::clone(&self.cache);
        let tenant = tenant_id.to_string();
        let code = code.to_string();
        let cached_record = record.clone();
        let ttl = self.cache_ttl_seconds;
        tokio::spawn(async move {
            if let Err(e) = cache.put(&tenant, &code, &cached_record, Some(ttl)).await {
                warn!(%tenant, %code, "failed to cache record: {e}");
            }
        });

        Ok(record)
    }

    /// Drops the cached entry for a code.
    ///
    /// Collaborators that deactivate or delete a record must call this with
    /// the record's key; it is the other half of the cache consistency
    /// contract the resolution path relies on.
    pub async fn invalidate(&self, tenant_id: &str, code: &str) {
        if let Err(e) = self.cache.invalidate(tenant_id, code).await {
            warn!(tenant_id, code, "cache invalidation failed: {e}");
        }
    }
}

/// Maps a record's lifecycle state onto the resolution outcome.
fn gate(record: LinkRecord) -> Result<LinkRecord, EngineError> {
    if record.is_deleted() {
        return Err(EngineError::NotFound);
    }
    if !record.active {
        return Err(EngineError::Inactive);
    }
    if record.is_expired() {
        return Err(EngineError::Expired);
    }
    Ok(record)
}
