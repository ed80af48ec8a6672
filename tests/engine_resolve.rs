//! Integration tests for the resolution path and cache consistency.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use link_engine::domain::repositories::LinkStore;
use link_engine::error::EngineError;
use link_engine::infrastructure::cache::{LookupCache, MemoryCache};

#[tokio::test]
async fn test_created_link_resolves() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com/page")
        .await
        .unwrap();

    let resolved = resolver.resolve("1", &link.code).await.unwrap();
    assert_eq!(resolved.canonical_url, "https://example.com/page");
    assert_eq!(resolved.original_url, "https://example.com/page");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let store = common::memory_store();
    let resolver = common::resolver(&store);

    let result = resolver.resolve("1", "nosuchcode").await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[tokio::test]
async fn test_codes_do_not_resolve_across_tenants() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();

    let result = resolver.resolve("2", &link.code).await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[tokio::test]
async fn test_deactivated_link_is_inactive() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();
    assert!(store.deactivate("1", &link.code));

    let result = resolver.resolve("1", &link.code).await;
    assert!(matches!(result, Err(EngineError::Inactive)));
}

#[tokio::test]
async fn test_expired_link_is_expired() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();
    assert!(store.set_expiry("1", &link.code, Utc::now() - Duration::seconds(1)));

    let result = resolver.resolve("1", &link.code).await;
    assert!(matches!(result, Err(EngineError::Expired)));
}

#[tokio::test]
async fn test_soft_deleted_link_is_not_found() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();
    assert!(store.soft_delete("1", &link.code));

    let result = resolver.resolve("1", &link.code).await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[tokio::test]
async fn test_resolution_populates_the_cache() {
    let store = common::memory_store();
    let cache = Arc::new(MemoryCache::new(1024, common::CACHE_TTL));
    let shortener = common::shortener(&store);
    let resolver = common::resolver_with_cache(&store, Arc::clone(&cache));

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();

    resolver.resolve("1", &link.code).await.unwrap();
    // The write-back runs in a spawned task.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let cached = cache.get("1", &link.code).await.unwrap();
    assert_eq!(cached.unwrap().canonical_url, "https://example.com/");
}

#[tokio::test]
async fn test_invalidation_contract_prevents_stale_redirects() {
    let store = common::memory_store();
    let cache = Arc::new(MemoryCache::new(1024, common::CACHE_TTL));
    let shortener = common::shortener(&store);
    let resolver = common::resolver_with_cache(&store, Arc::clone(&cache));

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();

    // Warm the cache, then deactivate through the collaborator-side path
    // and honor the invalidation contract.
    resolver.resolve("1", &link.code).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert!(store.deactivate("1", &link.code));
    resolver.invalidate("1", &link.code).await;

    let result = resolver.resolve("1", &link.code).await;
    assert!(matches!(result, Err(EngineError::Inactive)));
}

#[tokio::test]
async fn test_cached_hit_serves_after_store_mutation_without_invalidation() {
    // Without invalidation the cache may serve the old record within its
    // TTL, but only as long as that record was resolvable when cached; the
    // engine still never redirects a record the cache knows is unresolvable.
    let store = common::memory_store();
    let cache = Arc::new(MemoryCache::new(1024, common::CACHE_TTL));
    let shortener = common::shortener(&store);
    let resolver = common::resolver_with_cache(&store, Arc::clone(&cache));

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();

    resolver.resolve("1", &link.code).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    store.deactivate("1", &link.code);

    // Bounded staleness: the cached copy still claims active within TTL.
    let resolved = resolver.resolve("1", &link.code).await.unwrap();
    assert_eq!(resolved.canonical_url, "https://example.com/");
}

#[tokio::test]
async fn test_colon_bearing_tenant_ids_do_not_alias_in_the_cache() {
    let store = common::memory_store();
    let cache = Arc::new(MemoryCache::new(1024, common::CACHE_TTL));
    let shortener = common::shortener(&store);
    let resolver = common::resolver_with_cache(&store, Arc::clone(&cache));

    let link = shortener
        .get_or_create("acme:eu", "https://internal.example.com/secret")
        .await
        .unwrap();

    // Warm the cache under the owning tenant.
    resolver.resolve("acme:eu", &link.code).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Tenant "acme" with code "eu:<code>" builds the same flat cache key;
    // it must not resolve to the other tenant's URL.
    let aliased = format!("eu:{}", link.code);
    let result = resolver.resolve("acme", &aliased).await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[tokio::test]
async fn test_resolution_never_mutates_the_record() {
    let store = common::memory_store();
    let shortener = common::shortener(&store);
    let resolver = common::resolver(&store);

    let link = shortener
        .get_or_create("1", "https://example.com")
        .await
        .unwrap();

    for _ in 0..5 {
        resolver.resolve("1", &link.code).await.unwrap();
    }

    let after = store
        .find_by_code("1", &link.code)
        .await
        .unwrap()
        .expect("record must still exist");
    assert_eq!(after.click_count, 0);
    assert_eq!(after.created_at, link.created_at);
}
