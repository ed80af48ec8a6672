//! Caching layer for the resolution path.
//!
//! Provides a [`LookupCache`] trait with three implementations:
//! - [`RedisCache`] - production Redis-backed cache
//! - [`MemoryCache`] - in-process moka cache for embedded use
//! - [`NullCache`] - no-op implementation for disabled caching

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, LookupCache};

#[cfg(test)]
pub use service::MockLookupCache;
