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

//! Backing byte store trait.

use crate::error::StorageError;
use async_trait::async_trait;

/// Durable byte storage addressed by relative paths.
///
/// `write` fully replaces prior content; readers never observe a
/// half-written object.
#[async_trait]
pub trait ByteStore: Send + Sync {
    /// Durably writes `data` at `path`, replacing any prior content.
    async fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Reads the full content stored at `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Removes the content stored at `path`.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Returns true iff content exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Returns the size in bytes of the content at `path`.
    async fn size(&self, path: &str) -> Result<u64, StorageError>;
}
