//! Repository trait definitions for the domain layer.
//!
//! The engine talks to storage exclusively through [`LinkStore`]; concrete
//! backends live in `crate::infrastructure::persistence`. Mock
//! implementations are generated via `mockall` for unit tests.

pub mod link_store;

pub use link_store::{InsertOutcome, LinkStore};

#[cfg(test)]
pub use link_store::MockLinkStore;
