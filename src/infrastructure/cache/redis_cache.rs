//! Redis-backed lookup cache.

use super::service::{cache_key, CacheError, CacheResult, LookupCache};
use crate::domain::entities::LinkRecord;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::{debug, error, info, warn};

/// Redis cache for resolved link records.
///
/// Records are stored as JSON under `link:{tenant}:{code}` with a TTL.
/// Uses `ConnectionManager` for connection reuse; all operations are
/// fail-open so a Redis outage degrades to store lookups.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and
    /// configures the default TTL applied when [`LookupCache::put`] is
    /// called without an explicit one.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }
}

#[async_trait]
impl LookupCache for RedisCache {
    async fn get(&self, tenant_id: &str, code: &str) -> CacheResult<Option<LinkRecord>> {
        let key = cache_key(&self.key_prefix, tenant_id, code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(payload)) => match serde_json::from_str::<LinkRecord>(&payload) {
                Ok(record) => {
                    debug!("Cache HIT: {}", key);
                    Ok(Some(record))
                }
                Err(e) => {
                    // Stale or corrupt payload; drop it and fall through.
                    warn!("Undecodable cache payload for {}: {}", key, e);
                    let _ = conn.del::<_, i32>(&key).await;
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn put(
        &self,
        tenant_id: &str,
        code: &str,
        record: &LinkRecord,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = cache_key(&self.key_prefix, tenant_id, code);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = match serde_json::to_string(record) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to serialize record for {}: {}", key, e);
                return Ok(());
            }
        };

        match conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, tenant_id: &str, code: &str) -> CacheResult<()> {
        let key = cache_key(&self.key_prefix, tenant_id, code);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", key);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
