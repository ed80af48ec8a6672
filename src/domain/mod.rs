//! Domain layer: entities and storage contracts.
//!
//! No infrastructure dependencies live here. [`repositories::LinkStore`]
//! defines what the engine needs from durable storage; the entities are
//! plain data. Business logic sits in [`crate::application::services`].

pub mod entities;
pub mod repositories;
