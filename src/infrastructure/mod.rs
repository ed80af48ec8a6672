//! Infrastructure layer: storage and cache backends.
//!
//! Implements the domain-layer contracts against PostgreSQL, Redis, and
//! in-process fallbacks.

pub mod cache;
pub mod persistence;
