//! Shared error taxonomy for the link engine.
//!
//! Every expected failure branch is a variant here; callers match on the
//! variant instead of parsing messages. Transient storage errors are carried
//! in [`EngineError::Storage`] without any retry policy attached — retrying
//! infrastructure failures is the caller's decision, not the engine's.

use thiserror::Error;

/// Errors produced by the engine's public operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The submitted URL could not be canonicalized.
    ///
    /// Terminal for the request; never retried by the engine.
    #[error("invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// A caller passed an argument the engine cannot work with
    /// (empty tenant, zero code length). This is a programmer error.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Every collision-retry attempt produced a code already taken by a
    /// different URL. Rare enough to be an operational anomaly.
    #[error("code collision retries exhausted after {attempts} attempts")]
    CollisionExhausted { attempts: u32 },

    /// No non-deleted record matches the requested code.
    #[error("short link not found")]
    NotFound,

    /// The record exists but has been administratively deactivated.
    #[error("short link is inactive")]
    Inactive,

    /// The record exists but is past its expiry time.
    #[error("short link has expired")]
    Expired,

    /// A storage backend failed (connectivity, timeout, protocol).
    /// Propagated unchanged from the [`crate::domain::repositories::LinkStore`]
    /// implementation.
    #[error("storage backend error")]
    Storage(#[source] anyhow::Error),
}

impl EngineError {
    /// Wraps an infrastructure failure from a store implementation.
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    /// Returns true for the resolution-time "gone" family of errors.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::NotFound | Self::Inactive | Self::Expired)
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        Self::storage(e)
    }
}
