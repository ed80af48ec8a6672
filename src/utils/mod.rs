//! Pure helper functions for the engine core.
//!
//! Everything in this module is side-effect free and safe for concurrent
//! use: canonicalization and code derivation never touch storage.

pub mod code_deriver;
pub mod url_canonicalizer;
