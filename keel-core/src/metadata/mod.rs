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

//! Metadata store: credential records and the bucket directory.

pub mod redb_store;

pub use redb_store::RedbMetadataStore;

use crate::error::StorageError;
use crate::types::{BucketRecord, Credential};
use async_trait::async_trait;

/// Persistent metadata operations consumed by the gateway core.
///
/// Reads are assumed strongly consistent with prior writes for the same
/// owner. All methods are callable from many concurrent requests.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Looks up a credential by access id. `Ok(None)` means no such record.
    async fn get_credential(&self, access_id: &str) -> Result<Option<Credential>, StorageError>;

    /// Persists a new credential record.
    ///
    /// # Errors
    ///
    /// `CredentialAlreadyExists` if the access id is taken.
    async fn create_credential(&self, credential: &Credential) -> Result<(), StorageError>;

    /// Overwrites the bytes-used counter for a credential.
    ///
    /// # Errors
    ///
    /// `UnknownCredential` if no record exists for the access id.
    async fn update_bytes_used(&self, access_id: &str, bytes_used: u64)
        -> Result<(), StorageError>;

    /// Returns true iff the (owner, name) bucket pair exists.
    async fn bucket_exists(&self, owner: &str, name: &str) -> Result<bool, StorageError>;

    /// Persists a new bucket record.
    ///
    /// # Errors
    ///
    /// `BucketAlreadyExists` if the (owner, name) pair is taken.
    async fn create_bucket(&self, record: &BucketRecord) -> Result<(), StorageError>;

    /// Lists bucket names owned by `owner`, in directory order.
    async fn list_buckets(&self, owner: &str) -> Result<Vec<String>, StorageError>;
}
