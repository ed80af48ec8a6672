//! In-process link store.
//!
//! Enforces the same two uniqueness constraints as the PostgreSQL backend,
//! atomically under one lock. Intended for embedded deployments, examples
//! and integration tests; the race-convergence tests run against it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{InsertOutcome, LinkStore};
use crate::error::EngineError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<LinkRecord>,
}

impl Inner {
    fn live(&self) -> impl Iterator<Item = &LinkRecord> {
        self.records.iter().filter(|r| r.deleted_at.is_none())
    }

    fn live_mut(&mut self, tenant_id: &str, code: &str) -> Option<&mut LinkRecord> {
        self.records
            .iter_mut()
            .find(|r| r.deleted_at.is_none() && r.tenant_id == tenant_id && r.code == code)
    }
}

/// Link store holding all records in memory.
pub struct MemoryLinkStore {
    inner: Mutex<Inner>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of records ever inserted, including soft-deleted ones.
    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    /// Deactivates a record. Returns false when no live record matches.
    ///
    /// Deactivation is a collaborator-side mutation; the caller owns the
    /// matching cache invalidation.
    pub fn deactivate(&self, tenant_id: &str, code: &str) -> bool {
        let mut inner = self.lock();
        match inner.live_mut(tenant_id, code) {
            Some(record) => {
                record.active = false;
                true
            }
            None => false,
        }
    }

    /// Soft-deletes a record, releasing its code and canonical URL for
    /// reuse. Returns false when no live record matches.
    pub fn soft_delete(&self, tenant_id: &str, code: &str) -> bool {
        let mut inner = self.lock();
        match inner.live_mut(tenant_id, code) {
            Some(record) => {
                record.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Sets an expiry on a record. Returns false when no live record matches.
    pub fn set_expiry(
        &self,
        tenant_id: &str,
        code: &str,
        expires_at: chrono::DateTime<Utc>,
    ) -> bool {
        let mut inner = self.lock();
        match inner.live_mut(tenant_id, code) {
            Some(record) => {
                record.expires_at = Some(expires_at);
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn find_by_canonical_url(
        &self,
        tenant_id: &str,
        canonical_url: &str,
    ) -> Result<Option<LinkRecord>, EngineError> {
        let inner = self.lock();
        let found = inner
            .live()
            .find(|r| r.tenant_id == tenant_id && r.canonical_url == canonical_url)
            .cloned();
        Ok(found)
    }

    async fn find_by_code(
        &self,
        tenant_id: &str,
        code: &str,
    ) -> Result<Option<LinkRecord>, EngineError> {
        let inner = self.lock();
        let found = inner
            .live()
            .find(|r| r.tenant_id == tenant_id && r.code == code)
            .cloned();
        Ok(found)
    }

    async fn insert(&self, new_link: NewLinkRecord) -> Result<InsertOutcome, EngineError> {
        let mut inner = self.lock();

        // Canonical-URL conflict takes priority: a racing creator of the
        // same URL means converge, not retry.
        if inner.live().any(|r| {
            r.tenant_id == new_link.tenant_id && r.canonical_url == new_link.canonical_url
        }) {
            return Ok(InsertOutcome::ConflictOnCanonicalUrl);
        }

        if inner
            .live()
            .any(|r| r.tenant_id == new_link.tenant_id && r.code == new_link.code)
        {
            return Ok(InsertOutcome::ConflictOnCode);
        }

        inner.next_id += 1;
        let record = LinkRecord {
            id: inner.next_id,
            tenant_id: new_link.tenant_id,
            code: new_link.code,
            canonical_url: new_link.canonical_url,
            original_url: new_link.original_url,
            active: true,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
            deleted_at: None,
            click_count: 0,
        };
        inner.records.push(record.clone());

        Ok(InsertOutcome::Inserted(record))
    }
}
