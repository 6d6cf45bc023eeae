// Copyright 2026 Keel Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-tenant quota accounting.
//!
//! `reserve` is a read-then-write against the metadata store with no
//! per-owner lock: two concurrent reserves for the same owner can both pass
//! the limit check against a stale counter and jointly overshoot the limit.

use crate::error::StorageError;
use crate::metadata::MetadataStore;
use std::sync::Arc;
use tracing::debug;

/// Checks and adjusts an owner's bytes-used counter against its plan limit.
#[derive(Clone)]
pub struct QuotaLedger {
    metadata: Arc<dyn MetadataStore>,
}

impl QuotaLedger {
    /// Creates a ledger over the given metadata store.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }

    /// Reserves `delta` bytes against the owner's plan limit.
    ///
    /// Persists the incremented counter only when the candidate value stays
    /// within the limit. A credential that cannot be read fails the request;
    /// it never silently allows the write.
    ///
    /// # Errors
    ///
    /// - `UnknownCredential` if the owner has no credential record
    /// - `QuotaExceeded` if the reservation would pass the plan limit
    pub async fn reserve(&self, owner: &str, delta: u64) -> Result<(), StorageError> {
        let credential = self
            .metadata
            .get_credential(owner)
            .await?
            .ok_or_else(|| StorageError::UnknownCredential {
                access_id: owner.to_string(),
            })?;

        let limit = credential.plan.limit_bytes();
        let candidate = credential.bytes_used + delta;
        if candidate > limit {
            return Err(StorageError::QuotaExceeded {
                requested: delta,
                used: credential.bytes_used,
                limit,
            });
        }

        self.metadata.update_bytes_used(owner, candidate).await?;
        debug!(
            "Quota reserve: owner={}, delta={}, used={}/{}",
            owner, delta, candidate, limit
        );
        Ok(())
    }

    /// Releases `delta` bytes back to the owner, clamping at zero.
    ///
    /// # Errors
    ///
    /// - `UnknownCredential` if the owner has no credential record
    pub async fn release(&self, owner: &str, delta: u64) -> Result<(), StorageError> {
        let credential = self
            .metadata
            .get_credential(owner)
            .await?
            .ok_or_else(|| StorageError::UnknownCredential {
                access_id: owner.to_string(),
            })?;

        let remaining = credential.bytes_used.saturating_sub(delta);
        self.metadata.update_bytes_used(owner, remaining).await?;
        debug!(
            "Quota release: owner={}, delta={}, used={}",
            owner, delta, remaining
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::RedbMetadataStore;
    use crate::types::{Credential, PlanTier};
    use tempfile::TempDir;

    async fn ledger_with_credential() -> (QuotaLedger, Arc<RedbMetadataStore>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store =
            Arc::new(RedbMetadataStore::new(&temp_dir.path().join("metadata.redb")).unwrap());
        store
            .create_credential(&Credential::new(
                "owner".to_string(),
                "secret".to_string(),
                PlanTier::Starter,
            ))
            .await
            .unwrap();
        (QuotaLedger::new(store.clone()), store, temp_dir)
    }

    #[tokio::test]
    async fn test_reserve_within_limit() {
        let (ledger, store, _temp) = ledger_with_credential().await;

        ledger.reserve("owner", 1000).await.unwrap();
        let cred = store.get_credential("owner").await.unwrap().unwrap();
        assert_eq!(cred.bytes_used, 1000);
    }

    #[tokio::test]
    async fn test_reserve_rejects_over_limit() {
        let (ledger, store, _temp) = ledger_with_credential().await;

        let limit = PlanTier::Starter.limit_bytes();
        ledger.reserve("owner", limit).await.unwrap();

        let err = ledger.reserve("owner", 1).await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));

        // A rejected reserve leaves the counter untouched.
        let cred = store.get_credential("owner").await.unwrap().unwrap();
        assert_eq!(cred.bytes_used, limit);
    }

    #[tokio::test]
    async fn test_reserve_exactly_at_limit() {
        let (ledger, _store, _temp) = ledger_with_credential().await;
        ledger.reserve("owner", PlanTier::Starter.limit_bytes()).await.unwrap();
    }

    #[tokio::test]
    async fn test_release_clamps_at_zero() {
        let (ledger, store, _temp) = ledger_with_credential().await;

        ledger.reserve("owner", 100).await.unwrap();
        ledger.release("owner", 5000).await.unwrap();

        let cred = store.get_credential("owner").await.unwrap().unwrap();
        assert_eq!(cred.bytes_used, 0);
    }

    #[tokio::test]
    async fn test_reserve_unknown_owner_fails() {
        let (ledger, _store, _temp) = ledger_with_credential().await;
        let err = ledger.reserve("ghost", 1).await.unwrap_err();
        assert!(matches!(err, StorageError::UnknownCredential { .. }));
    }
}
