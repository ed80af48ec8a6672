#![allow(dead_code)]

use std::sync::Arc;

use link_engine::application::services::{ResolverService, ShortenerService};
use link_engine::infrastructure::cache::MemoryCache;
use link_engine::infrastructure::persistence::MemoryLinkStore;

pub const CACHE_TTL: u64 = 60;

pub fn memory_store() -> Arc<MemoryLinkStore> {
    Arc::new(MemoryLinkStore::new())
}

pub fn shortener(store: &Arc<MemoryLinkStore>) -> ShortenerService<MemoryLinkStore> {
    ShortenerService::new(Arc::clone(store))
}

pub fn resolver(
    store: &Arc<MemoryLinkStore>,
) -> ResolverService<MemoryLinkStore, MemoryCache> {
    let cache = Arc::new(MemoryCache::new(1024, CACHE_TTL));
    ResolverService::new(Arc::clone(store), cache, CACHE_TTL)
}

pub fn resolver_with_cache(
    store: &Arc<MemoryLinkStore>,
    cache: Arc<MemoryCache>,
) -> ResolverService<MemoryLinkStore, MemoryCache> {
    ResolverService::new(Arc::clone(store), cache, CACHE_TTL)
}
