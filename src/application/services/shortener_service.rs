//! Get-or-create orchestration for short links.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{InsertOutcome, LinkStore};
use crate::error::EngineError;
use crate::utils::code_deriver::{derive_code, DEFAULT_CODE_LENGTH};
use crate::utils::url_canonicalizer::canonicalize_url;

/// Default number of collision-retry attempts before giving up.
pub const DEFAULT_MAX_COLLISION_ATTEMPTS: u32 = 10;

/// Service implementing deterministic get-or-create for short links.
///
/// Repeated calls with the same `(tenant, URL)` converge on one stored
/// record: the canonical URL is looked up first, and when two callers race
/// past that check, the store's uniqueness constraint picks exactly one
/// winner and the loser re-fetches the winner's record. Codes are always
/// derived, never random, so "same URL, same tenant" means "same code".
pub struct ShortenerService<S: LinkStore> {
    store: Arc<S>,
    code_length: usize,
    max_collision_attempts: u32,
}

impl<S: LinkStore> ShortenerService<S> {
    /// Creates a service with the default code length and retry budget.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, DEFAULT_CODE_LENGTH, DEFAULT_MAX_COLLISION_ATTEMPTS)
    }

    /// Creates a service with an explicit code length and retry budget.
    pub fn with_policy(store: Arc<S>, code_length: usize, max_collision_attempts: u32) -> Self {
        Self {
            store,
            code_length,
            max_collision_attempts,
        }
    }

    /// Returns the existing record for a URL or creates it.
    ///
    /// # State Machine
    ///
    /// 1. Canonicalize the raw URL; failure is terminal (`InvalidUrl`)
    /// 2. Look up `(tenant, canonical_url)`; a hit is returned as-is
    /// 3. Collision loop: derive a candidate code for the current salt and
    ///    attempt the insert
    ///    - inserted: done
    ///    - canonical-URL conflict: another caller won the race; re-fetch
    ///      and return the winner's record (not a salt retry)
    ///    - code conflict: genuine collision with a different URL; next salt
    /// 4. Budget exhausted: `CollisionExhausted`
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidUrl`] for rejected input,
    /// [`EngineError::InvalidArgument`] for an empty tenant id,
    /// [`EngineError::CollisionExhausted`] when every salt collided, and
    /// [`EngineError::Storage`] for backend failures.
    pub async fn get_or_create(
        &self,
        tenant_id: &str,
        raw_url: &str,
    ) -> Result<LinkRecord, EngineError> {
        if tenant_id.is_empty() {
            return Err(EngineError::InvalidArgument(
                "tenant id must not be empty".to_string(),
            ));
        }

        let canonical = canonicalize_url(raw_url).map_err(|e| EngineError::InvalidUrl {
            reason: e.to_string(),
        })?;

        if let Some(existing) = self
            .store
            .find_by_canonical_url(tenant_id, &canonical)
            .await?
        {
            debug!(
                tenant_id,
                code = %existing.code,
                "existing mapping found, creation skipped"
            );
            return Ok(existing);
        }

        for salt in 0..self.max_collision_attempts {
            let code = derive_code(&canonical, tenant_id, salt, self.code_length)
                .map_err(|e| EngineError::InvalidArgument(e.to_string()))?;

            let new_link = NewLinkRecord {
                tenant_id: tenant_id.to_string(),
                code: code.clone(),
                canonical_url: canonical.clone(),
                original_url: raw_url.trim().to_string(),
                expires_at: None,
            };

            match self.store.insert(new_link).await? {
                InsertOutcome::Inserted(record) => {
                    debug!(tenant_id, code = %record.code, salt, "short link created");
                    return Ok(record);
                }
                InsertOutcome::ConflictOnCanonicalUrl => {
                    // Race lost to a concurrent creator of the same URL;
                    // converge on the winner's record.
                    match self
                        .store
                        .find_by_canonical_url(tenant_id, &canonical)
                        .await?
                    {
                        Some(record) => {
                            debug!(
                                tenant_id,
                                code = %record.code,
                                "converged on concurrently created mapping"
                            );
                            return Ok(record);
                        }
                        None => {
                            // The winner was deleted between the conflict and
                            // the re-fetch; the next iteration recreates it.
                            warn!(tenant_id, "conflicting mapping vanished before re-fetch");
                            continue;
                        }
                    }
                }
                InsertOutcome::ConflictOnCode => {
                    warn!(tenant_id, %code, salt, "code collision, retrying with next salt");
                }
            }
        }

        error!(
            tenant_id,
            canonical_url = %canonical,
            attempts = self.max_collision_attempts,
            "collision retries exhausted"
        );
        Err(EngineError::CollisionExhausted {
            attempts: self.max_collision_attempts,
        })
    }
}
