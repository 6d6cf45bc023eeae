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

//! Error types for the storage core.

use thiserror::Error;

/// Errors that can occur in the storage core.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Bucket does not exist for the owner.
    #[error("Bucket not found: {owner}/{bucket}")]
    BucketNotFound {
        /// Owning access id.
        owner: String,
        /// Bucket name that was not found.
        bucket: String,
    },

    /// Object not found in the backing store.
    #[error("Object not found: {key}")]
    ObjectNotFound {
        /// Object key that was not found.
        key: String,
    },

    /// A write would push the owner past its plan limit.
    #[error("Storage limit exceeded: requested {requested} bytes, {used} of {limit} in use")]
    QuotaExceeded {
        /// Bytes the rejected write asked for.
        requested: u64,
        /// Bytes already in use by the owner.
        used: u64,
        /// Plan limit in bytes.
        limit: u64,
    },

    /// No credential record for the access id.
    #[error("Unknown credential: {access_id}")]
    UnknownCredential {
        /// Access id with no credential record.
        access_id: String,
    },

    /// A credential with this access id already exists.
    #[error("Credential already exists: {access_id}")]
    CredentialAlreadyExists {
        /// Access id that is already taken.
        access_id: String,
    },

    /// The (owner, bucket) pair already exists.
    #[error("Bucket already exists: {owner}/{bucket}")]
    BucketAlreadyExists {
        /// Owning access id.
        owner: String,
        /// Bucket name that is already taken.
        bucket: String,
    },

    /// Object key failed validation before path resolution.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// Bucket name failed validation.
    #[error("Invalid bucket name: {0}")]
    InvalidBucketName(String),

    /// Backing byte store IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata store operation error.
    #[error("Metadata store error: {0}")]
    Metadata(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
