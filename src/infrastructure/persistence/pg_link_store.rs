//! PostgreSQL implementation of the link store.
//!
//! Expects the following schema; uniqueness is enforced with partial unique
//! indexes so that soft-deleted rows free up their code and canonical URL:
//!
//! ```sql
//! CREATE TABLE links (
//!     id            BIGSERIAL PRIMARY KEY,
//!     tenant_id     TEXT NOT NULL,
//!     code          TEXT NOT NULL,
//!     canonical_url TEXT NOT NULL,
//!     original_url  TEXT NOT NULL,
//!     active        BOOLEAN NOT NULL DEFAULT TRUE,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     expires_at    TIMESTAMPTZ,
//!     deleted_at    TIMESTAMPTZ,
//!     click_count   BIGINT NOT NULL DEFAULT 0
//! );
//!
//! CREATE UNIQUE INDEX links_tenant_code_key
//!     ON links (tenant_id, code) WHERE deleted_at IS NULL;
//! CREATE UNIQUE INDEX links_tenant_canonical_key
//!     ON links (tenant_id, canonical_url) WHERE deleted_at IS NULL;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{InsertOutcome, LinkStore};
use crate::error::EngineError;

/// Index backing the `(tenant_id, code)` uniqueness constraint.
const CODE_CONSTRAINT: &str = "links_tenant_code_key";

/// Index backing the `(tenant_id, canonical_url)` uniqueness constraint.
const CANONICAL_CONSTRAINT: &str = "links_tenant_canonical_key";

const SELECT_COLUMNS: &str = "id, tenant_id, code, canonical_url, original_url, active, \
     created_at, expires_at, deleted_at, click_count";

/// PostgreSQL repository for link records.
///
/// The database's unique indexes are the linearization point for concurrent
/// get-or-create: exactly one insert per `(tenant, canonical_url)` succeeds,
/// and losers observe the conflict through [`InsertOutcome`].
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store backed by a connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    tenant_id: String,
    code: String,
    canonical_url: String,
    original_url: String,
    active: bool,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    click_count: i64,
}

impl From<LinkRow> for LinkRecord {
    fn from(r: LinkRow) -> Self {
        LinkRecord {
            id: r.id,
            tenant_id: r.tenant_id,
            code: r.code,
            canonical_url: r.canonical_url,
            original_url: r.original_url,
            active: r.active,
            created_at: r.created_at,
            expires_at: r.expires_at,
            deleted_at: r.deleted_at,
            click_count: r.click_count,
        }
    }
}

/// Maps a unique violation onto the constraint it hit, if any.
fn classify_unique_violation(e: &sqlx::Error) -> Option<InsertOutcome> {
    let db_err = e.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(CODE_CONSTRAINT) => Some(InsertOutcome::ConflictOnCode),
        Some(CANONICAL_CONSTRAINT) => Some(InsertOutcome::ConflictOnCanonicalUrl),
        _ => None,
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn find_by_canonical_url(
        &self,
        tenant_id: &str,
        canonical_url: &str,
    ) -> Result<Option<LinkRecord>, EngineError> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM links \
             WHERE tenant_id = $1 AND canonical_url = $2 AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, LinkRow>(&query)
            .bind(tenant_id)
            .bind(canonical_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(LinkRecord::from))
    }

    async fn find_by_code(
        &self,
        tenant_id: &str,
        code: &str,
    ) -> Result<Option<LinkRecord>, EngineError> {
        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM links \
             WHERE tenant_id = $1 AND code = $2 AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, LinkRow>(&query)
            .bind(tenant_id)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(LinkRecord::from))
    }

    async fn insert(&self, new_link: NewLinkRecord) -> Result<InsertOutcome, EngineError> {
        let query = format!(
            "INSERT INTO links (tenant_id, code, canonical_url, original_url, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SELECT_COLUMNS}"
        );

        let result = sqlx::query_as::<_, LinkRow>(&query)
            .bind(&new_link.tenant_id)
            .bind(&new_link.code)
            .bind(&new_link.canonical_url)
            .bind(&new_link.original_url)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row.into())),
            Err(e) => match classify_unique_violation(&e) {
                Some(outcome) => Ok(outcome),
                None => Err(e.into()),
            },
        }
    }
}
