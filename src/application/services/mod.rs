//! Engine services.
//!
//! [`ShortenerService`] owns creation (get-or-create with collision retry);
//! [`ResolverService`] owns the read path (cache-aside resolution).

pub mod resolver_service;
pub mod shortener_service;

pub use resolver_service::ResolverService;
pub use shortener_service::{ShortenerService, DEFAULT_MAX_COLLISION_ATTEMPTS};
