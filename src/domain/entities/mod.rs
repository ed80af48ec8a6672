//! Core domain entities.
//!
//! Plain data structures with no business logic. [`LinkRecord`] is the one
//! persisted entity; [`NewLinkRecord`] carries the fields for insertion.

pub mod link;

pub use link::{LinkRecord, NewLinkRecord};
