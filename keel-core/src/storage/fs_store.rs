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

//! Filesystem-backed byte store.
//!
//! Writes land in a temporary sibling file and are renamed into place, so a
//! replace is atomic from the reader's perspective on the same filesystem.

use crate::error::StorageError;
use crate::storage::store::ByteStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Byte store rooted at a directory on the local filesystem.
pub struct FsByteStore {
    root: PathBuf,
}

impl FsByteStore {
    /// Creates a byte store under `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn temp_path(final_path: &Path) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = final_path.file_name().and_then(|n| n.to_str()).unwrap_or("object");
        final_path.with_file_name(format!(".{}.tmp.{}.{}", name, std::process::id(), seq))
    }
}

#[async_trait]
impl ByteStore for FsByteStore {
    async fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let final_path = self.resolve(path);
        if let Some(parent) = final_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Temp file plus rename keeps a concurrent reader on either the old
        // or the new content, never a partial write.
        let temp_path = Self::temp_path(&final_path);
        tokio::fs::write(&temp_path, data).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(tokio::fs::read(self.resolve(path)).await?)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        tokio::fs::remove_file(self.resolve(path)).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        match tokio::fs::metadata(self.resolve(path)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        Ok(tokio::fs::metadata(self.resolve(path)).await?.len())
    }
}
