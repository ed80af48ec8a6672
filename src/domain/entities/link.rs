//! Link record entity: one short code mapped to one canonical URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted short-link mapping, scoped to a tenant.
///
/// Within one tenant, at most one non-deleted record exists per `code` and
/// per `canonical_url`; both constraints are enforced by the store. The
/// engine only ever inserts records — deactivation, deletion and click
/// bookkeeping belong to outside collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    /// Opaque namespace identifier; no code or URL mapping crosses tenants.
    pub tenant_id: String,
    /// Alphabet-restricted short identifier, derived, never random.
    pub code: String,
    /// Normalized URL used for equality and hashing.
    pub canonical_url: String,
    /// The raw URL as submitted, kept for display only.
    pub original_url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl LinkRecord {
    /// Returns true if the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the record is past its expiry time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Returns true if the record currently resolves to a redirect.
    pub fn is_resolvable(&self) -> bool {
        self.active && !self.is_deleted() && !self.is_expired()
    }
}

/// Input data for inserting a new link record.
#[derive(Debug, Clone)]
pub struct NewLinkRecord {
    pub tenant_id: String,
    pub code: String,
    pub canonical_url: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}
