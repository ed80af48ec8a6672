//! Concrete [`crate::domain::repositories::LinkStore`] backends.

mod memory_link_store;
mod pg_link_store;

pub use memory_link_store::MemoryLinkStore;
pub use pg_link_store::PgLinkStore;
