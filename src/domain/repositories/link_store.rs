//! Store interface for short-link records.

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::error::EngineError;
use async_trait::async_trait;

/// Result of an insert attempt against the store's uniqueness constraints.
///
/// The two conflict kinds are deliberately separate variants: a canonical-URL
/// conflict means another caller created the same mapping first (the caller
/// should re-fetch and converge), while a code conflict is a genuine hash
/// collision with a different URL (the caller should re-derive with the next
/// salt). Collapsing them would break get-or-create idempotence.
#[derive(Debug)]
pub enum InsertOutcome {
    /// The record was inserted; the stored row is returned.
    Inserted(LinkRecord),
    /// A non-deleted record with the same `(tenant_id, code)` exists.
    ConflictOnCode,
    /// A non-deleted record with the same `(tenant_id, canonical_url)` exists.
    ConflictOnCanonicalUrl,
}

/// Durable keyed storage for link records.
///
/// Implementations must enforce both per-tenant uniqueness constraints
/// atomically at insert time — the race-convergence guarantee of
/// get-or-create rests on the store's constraint, not on application-level
/// locking. Soft-deleted records do not participate in the constraints.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Finds the non-deleted record for `(tenant_id, canonical_url)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] on backend failures.
    async fn find_by_canonical_url(
        &self,
        tenant_id: &str,
        canonical_url: &str,
    ) -> Result<Option<LinkRecord>, EngineError>;

    /// Finds the non-deleted record for `(tenant_id, code)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] on backend failures.
    async fn find_by_code(
        &self,
        tenant_id: &str,
        code: &str,
    ) -> Result<Option<LinkRecord>, EngineError>;

    /// Attempts to insert a new record.
    ///
    /// Constraint violations are reported through [`InsertOutcome`], not as
    /// errors — they are expected outcomes of concurrent creation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Storage`] on backend failures unrelated to the
    /// uniqueness constraints.
    async fn insert(&self, new_link: NewLinkRecord) -> Result<InsertOutcome, EngineError>;
}
