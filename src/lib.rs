//! # Link Engine
//!
//! Deterministic short-link engine: maps long URLs to short, stable
//! identifiers scoped to a tenant, and resolves them back on a
//! latency-sensitive read path.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer
//! separation:
//!
//! - **Domain Layer** ([`domain`]) - the [`domain::entities::LinkRecord`]
//!   entity and the [`domain::repositories::LinkStore`] storage contract
//! - **Application Layer** ([`application`]) - the get-or-create
//!   orchestrator and the cache-aside resolver
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL and
//!   in-memory stores, Redis/moka/null lookup caches
//! - **Utilities** ([`utils`]) - pure URL canonicalization and code
//!   derivation
//!
//! ## Guarantees
//!
//! - A code is a pure function of `(canonical URL, tenant, retry salt)`;
//!   the same URL shortened twice in a tenant yields the same code
//! - Concurrent creation of the same URL converges on one stored record,
//!   linearized by the store's uniqueness constraints
//! - Cached resolutions never redirect through a deactivated, deleted or
//!   expired record
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use link_engine::application::services::{ResolverService, ShortenerService};
//! use link_engine::infrastructure::cache::MemoryCache;
//! use link_engine::infrastructure::persistence::MemoryLinkStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), link_engine::EngineError> {
//! let store = Arc::new(MemoryLinkStore::new());
//! let cache = Arc::new(MemoryCache::new(10_000, 3600));
//!
//! let shortener = ShortenerService::new(Arc::clone(&store));
//! let resolver = ResolverService::new(Arc::clone(&store), cache, 3600);
//!
//! let link = shortener.get_or_create("1", "https://example.com").await?;
//! let resolved = resolver.resolve("1", &link.code).await?;
//! assert_eq!(resolved.canonical_url, "https://example.com/");
//! # Ok(())
//! # }
//! ```
//!
//! The HTTP surface, authentication, analytics and webhook delivery are
//! collaborators outside this crate; they call in through the two services
//! and honor the cache invalidation contract on
//! [`application::services::ResolverService::invalidate`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::EngineError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ResolverService, ShortenerService};
    pub use crate::config::Config;
    pub use crate::domain::entities::{LinkRecord, NewLinkRecord};
    pub use crate::domain::repositories::{InsertOutcome, LinkStore};
    pub use crate::error::EngineError;
    pub use crate::infrastructure::cache::{LookupCache, MemoryCache, NullCache, RedisCache};
    pub use crate::infrastructure::persistence::{MemoryLinkStore, PgLinkStore};
}
