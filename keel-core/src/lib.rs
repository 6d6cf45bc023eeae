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

//! Keel storage core.
//!
//! This crate provides the tenant-facing storage machinery:
//! - Object storage engine (tenant-scoped namespace over a backing byte store)
//! - Metadata store (credentials and bucket directory)
//! - Quota ledger (per-tenant bytes-used accounting)
//!
//! It has no HTTP knowledge; the API layer lives in `keel-api`.

pub mod error;
pub mod metadata;
pub mod quota;
pub mod storage;
pub mod types;

pub use error::StorageError;
pub use metadata::{MetadataStore, RedbMetadataStore};
pub use quota::QuotaLedger;
pub use storage::{ByteStore, FsByteStore, ObjectStorageEngine};
pub use types::{BucketRecord, Credential, PlanTier};
