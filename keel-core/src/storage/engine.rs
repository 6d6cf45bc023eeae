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

//! Tenant-scoped object storage engine.
//!
//! Resolves (owner, bucket, key) triples onto the backing byte store as
//! `owner/bucket/key`, charges the quota ledger around every mutation, and
//! returns content fingerprints on write.
//!
//! No cross-request locking is taken per tenant or per object: concurrent
//! writes to one key interleave at the store level (each replace itself is
//! atomic), and concurrent same-owner writes may jointly pass the quota
//! check. See the quota module docs.

use crate::error::StorageError;
use crate::metadata::MetadataStore;
use crate::quota::QuotaLedger;
use crate::storage::keys::validate_object_key;
use crate::storage::store::ByteStore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Computes the content fingerprint: lowercase hex SHA-256 of the bytes.
pub fn fingerprint(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Object storage engine over a backing byte store and the metadata store.
#[derive(Clone)]
pub struct ObjectStorageEngine {
    store: Arc<dyn ByteStore>,
    metadata: Arc<dyn MetadataStore>,
    ledger: QuotaLedger,
}

impl ObjectStorageEngine {
    /// Creates an engine over the given byte store and metadata store.
    pub fn new(store: Arc<dyn ByteStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        let ledger = QuotaLedger::new(metadata.clone());
        Self {
            store,
            metadata,
            ledger,
        }
    }

    /// Returns true iff the owner has a bucket with this name.
    pub async fn bucket_exists(&self, owner: &str, bucket: &str) -> Result<bool, StorageError> {
        self.metadata.bucket_exists(owner, bucket).await
    }

    /// Lists bucket names owned by the authenticated identity.
    pub async fn list_buckets(&self, owner: &str) -> Result<Vec<String>, StorageError> {
        self.metadata.list_buckets(owner).await
    }

    /// Writes an object, fully replacing any prior content at the key.
    ///
    /// The quota reservation happens before the byte payload is persisted;
    /// a rejected reservation leaves the store untouched. On a replace, the
    /// prior size is released after the write, so a replace transiently
    /// charges both sizes against the limit.
    ///
    /// # Returns
    ///
    /// The content fingerprint of the stored bytes.
    ///
    /// # Errors
    ///
    /// - `BucketNotFound` if the owner has no such bucket
    /// - `InvalidKey` if the key fails validation
    /// - `QuotaExceeded` if the reservation would pass the plan limit
    pub async fn put_object(
        &self,
        owner: &str,
        bucket: &str,
        key: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        self.require_bucket(owner, bucket).await?;
        validate_object_key(key)?;
        let path = object_path(owner, bucket, key);

        let prior_size = if self.store.exists(&path).await? {
            Some(self.store.size(&path).await?)
        } else {
            None
        };

        let new_size = content.len() as u64;
        self.ledger.reserve(owner, new_size).await?;

        if let Err(e) = self.store.write(&path, content).await {
            // The reservation must not outlive a failed write.
            if let Err(release_err) = self.ledger.release(owner, new_size).await {
                warn!(
                    "Failed to release reservation after write error: owner={}, bytes={}, error={}",
                    owner, new_size, release_err
                );
            }
            return Err(e);
        }

        if let Some(prior) = prior_size {
            if let Err(e) = self.ledger.release(owner, prior).await {
                // The owner stays over-charged until a later release.
                warn!(
                    "Failed to release replaced object size: owner={}, bytes={}, error={}",
                    owner, prior, e
                );
            }
        }

        let digest = fingerprint(content);
        debug!(
            "PutObject: owner={}, bucket={}, key={}, size={}, fingerprint={}",
            owner, bucket, key, new_size, digest
        );
        Ok(digest)
    }

    /// Reads an object's stored bytes, unmodified.
    ///
    /// # Errors
    ///
    /// - `BucketNotFound` if the owner has no such bucket
    /// - `ObjectNotFound` if nothing is stored at the key
    pub async fn get_object(
        &self,
        owner: &str,
        bucket: &str,
        key: &str,
    ) -> Result<Vec<u8>, StorageError> {
        self.require_bucket(owner, bucket).await?;
        validate_object_key(key)?;
        let path = object_path(owner, bucket, key);

        if !self.store.exists(&path).await? {
            return Err(StorageError::ObjectNotFound {
                key: key.to_string(),
            });
        }
        self.store.read(&path).await
    }

    /// Deletes an object and releases its size back to the owner's quota.
    ///
    /// A release failure after a successful removal leaves the owner
    /// over-charged; the delete still reports success.
    ///
    /// # Errors
    ///
    /// - `BucketNotFound` if the owner has no such bucket
    /// - `ObjectNotFound` if nothing is stored at the key
    pub async fn delete_object(
        &self,
        owner: &str,
        bucket: &str,
        key: &str,
    ) -> Result<(), StorageError> {
        self.require_bucket(owner, bucket).await?;
        validate_object_key(key)?;
        let path = object_path(owner, bucket, key);

        if !self.store.exists(&path).await? {
            return Err(StorageError::ObjectNotFound {
                key: key.to_string(),
            });
        }

        let size = self.store.size(&path).await?;
        self.store.delete(&path).await?;

        if let Err(e) = self.ledger.release(owner, size).await {
            warn!(
                "Object removed but quota release failed: owner={}, bytes={}, error={}",
                owner, size, e
            );
        }

        debug!(
            "DeleteObject: owner={}, bucket={}, key={}, released={}",
            owner, bucket, key, size
        );
        Ok(())
    }

    async fn require_bucket(&self, owner: &str, bucket: &str) -> Result<(), StorageError> {
        if !self.metadata.bucket_exists(owner, bucket).await? {
            return Err(StorageError::BucketNotFound {
                owner: owner.to_string(),
                bucket: bucket.to_string(),
            });
        }
        Ok(())
    }
}

/// Resolves the backing-store path for an object.
fn object_path(owner: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", owner, bucket, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        // SHA-256 of the empty input.
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint(b"hello").len(), 64);
        assert_ne!(fingerprint(b"hello"), fingerprint(b"hello!"));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint(b"same bytes"), fingerprint(b"same bytes"));
    }

    #[test]
    fn test_object_path_layout() {
        assert_eq!(object_path("ak", "photos", "a/b.txt"), "ak/photos/a/b.txt");
    }
}
