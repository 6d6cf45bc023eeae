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

//! redb-backed metadata store.
//!
//! Credentials and bucket records live in two keyed tables. Bucket keys are
//! `{owner}/{name}`; owner ids never contain `/`, so listing an owner's
//! buckets is a prefix scan.

use crate::error::StorageError;
use crate::metadata::MetadataStore;
use crate::types::{BucketRecord, Credential};
use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;

const CREDENTIALS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("credentials");
const BUCKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("buckets");

/// Metadata store backed by a single redb database file.
/// Uses one database connection with a mutex for thread-safe access.
pub struct RedbMetadataStore {
    db: Arc<Mutex<Database>>,
}

impl RedbMetadataStore {
    /// Creates or opens the metadata database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the redb database file
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let db = Database::create(db_path).map_err(|e| StorageError::Metadata(e.to_string()))?;

        // Initialize tables (redb requires a write transaction to create tables)
        let write_txn = db.begin_write().map_err(|e| StorageError::Metadata(e.to_string()))?;
        {
            let _credentials = write_txn
                .open_table(CREDENTIALS_TABLE)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;
            let _buckets = write_txn
                .open_table(BUCKETS_TABLE)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;
        }
        write_txn.commit().map_err(|e| StorageError::Metadata(e.to_string()))?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn bucket_key(owner: &str, name: &str) -> String {
        format!("{}/{}", owner, name)
    }
}

#[async_trait]
impl MetadataStore for RedbMetadataStore {
    async fn get_credential(&self, access_id: &str) -> Result<Option<Credential>, StorageError> {
        let db = self.db.clone();
        let access_id = access_id.to_string();

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let read_txn =
                db_guard.begin_read().map_err(|e| StorageError::Metadata(e.to_string()))?;
            let table = read_txn
                .open_table(CREDENTIALS_TABLE)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;

            match table.get(&*access_id) {
                Ok(Some(value)) => {
                    let credential: Credential = bincode::deserialize(value.value())
                        .map_err(|e| StorageError::Serialization(e.to_string()))?;
                    Ok(Some(credential))
                }
                Ok(None) => Ok(None),
                Err(e) => Err(StorageError::Metadata(e.to_string())),
            }
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }

    async fn create_credential(&self, credential: &Credential) -> Result<(), StorageError> {
        let db = self.db.clone();
        let access_id = credential.access_id.clone();
        let record_bytes = bincode::serialize(credential)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let write_txn =
                db_guard.begin_write().map_err(|e| StorageError::Metadata(e.to_string()))?;
            {
                let mut table = write_txn
                    .open_table(CREDENTIALS_TABLE)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;

                let taken = table
                    .get(&*access_id)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?
                    .is_some();
                if taken {
                    return Err(StorageError::CredentialAlreadyExists { access_id });
                }

                table
                    .insert(&*access_id, &record_bytes[..])
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;
            }
            write_txn.commit().map_err(|e| StorageError::Metadata(e.to_string()))?;

            Ok::<(), StorageError>(())
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }

    async fn update_bytes_used(
        &self,
        access_id: &str,
        bytes_used: u64,
    ) -> Result<(), StorageError> {
        let db = self.db.clone();
        let access_id = access_id.to_string();

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let write_txn =
                db_guard.begin_write().map_err(|e| StorageError::Metadata(e.to_string()))?;
            {
                let mut table = write_txn
                    .open_table(CREDENTIALS_TABLE)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;

                let mut credential: Credential = match table
                    .get(&*access_id)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?
                {
                    Some(value) => bincode::deserialize(value.value())
                        .map_err(|e| StorageError::Serialization(e.to_string()))?,
                    None => {
                        return Err(StorageError::UnknownCredential { access_id });
                    }
                };

                credential.bytes_used = bytes_used;
                credential.updated_at = chrono::Utc::now();

                let record_bytes = bincode::serialize(&credential)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                table
                    .insert(&*access_id, &record_bytes[..])
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;
            }
            write_txn.commit().map_err(|e| StorageError::Metadata(e.to_string()))?;

            Ok::<(), StorageError>(())
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }

    async fn bucket_exists(&self, owner: &str, name: &str) -> Result<bool, StorageError> {
        let db = self.db.clone();
        let key = Self::bucket_key(owner, name);

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let read_txn =
                db_guard.begin_read().map_err(|e| StorageError::Metadata(e.to_string()))?;
            let table = read_txn
                .open_table(BUCKETS_TABLE)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;

            let exists = table
                .get(&*key)
                .map_err(|e| StorageError::Metadata(e.to_string()))?
                .is_some();
            Ok(exists)
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }

    async fn create_bucket(&self, record: &BucketRecord) -> Result<(), StorageError> {
        let db = self.db.clone();
        let owner = record.owner.clone();
        let name = record.name.clone();
        let key = Self::bucket_key(&record.owner, &record.name);
        let record_bytes =
            bincode::serialize(record).map_err(|e| StorageError::Serialization(e.to_string()))?;

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let write_txn =
                db_guard.begin_write().map_err(|e| StorageError::Metadata(e.to_string()))?;
            {
                let mut table = write_txn
                    .open_table(BUCKETS_TABLE)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;

                let taken = table
                    .get(&*key)
                    .map_err(|e| StorageError::Metadata(e.to_string()))?
                    .is_some();
                if taken {
                    return Err(StorageError::BucketAlreadyExists { owner, bucket: name });
                }

                table
                    .insert(&*key, &record_bytes[..])
                    .map_err(|e| StorageError::Metadata(e.to_string()))?;
            }
            write_txn.commit().map_err(|e| StorageError::Metadata(e.to_string()))?;

            Ok::<(), StorageError>(())
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }

    async fn list_buckets(&self, owner: &str) -> Result<Vec<String>, StorageError> {
        let db = self.db.clone();
        let prefix = format!("{}/", owner);

        task::spawn_blocking(move || {
            let db_guard = futures::executor::block_on(db.lock());

            let read_txn =
                db_guard.begin_read().map_err(|e| StorageError::Metadata(e.to_string()))?;
            let table = read_txn
                .open_table(BUCKETS_TABLE)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;

            let mut names = Vec::new();
            let range = table
                .range(prefix.as_str()..)
                .map_err(|e| StorageError::Metadata(e.to_string()))?;
            for entry in range {
                let (key, _value) = entry.map_err(|e| StorageError::Metadata(e.to_string()))?;
                let key = key.value();
                match key.strip_prefix(prefix.as_str()) {
                    Some(name) => names.push(name.to_string()),
                    // Keys are sorted; the first non-matching key ends the scan.
                    None => break,
                }
            }
            Ok(names)
        })
        .await
        .map_err(|e| StorageError::Metadata(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlanTier;
    use tempfile::TempDir;

    fn test_store() -> (RedbMetadataStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("metadata.redb");
        let store = RedbMetadataStore::new(&db_path).expect("Failed to create store");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_credential_roundtrip() {
        let (store, _temp) = test_store();

        let cred = Credential::new("ak-1".to_string(), "sk-1".to_string(), PlanTier::Starter);
        store.create_credential(&cred).await.unwrap();

        let loaded = store.get_credential("ak-1").await.unwrap().unwrap();
        assert_eq!(loaded.access_id, "ak-1");
        assert_eq!(loaded.secret, "sk-1");
        assert_eq!(loaded.bytes_used, 0);
        assert_eq!(loaded.plan, PlanTier::Starter);
    }

    #[tokio::test]
    async fn test_get_missing_credential() {
        let (store, _temp) = test_store();
        assert!(store.get_credential("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_credential_rejected() {
        let (store, _temp) = test_store();

        let cred = Credential::new("ak-1".to_string(), "sk-1".to_string(), PlanTier::Starter);
        store.create_credential(&cred).await.unwrap();

        let err = store.create_credential(&cred).await.unwrap_err();
        assert!(matches!(err, StorageError::CredentialAlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_bytes_used() {
        let (store, _temp) = test_store();

        let cred = Credential::new("ak-1".to_string(), "sk-1".to_string(), PlanTier::Starter);
        store.create_credential(&cred).await.unwrap();

        store.update_bytes_used("ak-1", 4096).await.unwrap();
        let loaded = store.get_credential("ak-1").await.unwrap().unwrap();
        assert_eq!(loaded.bytes_used, 4096);
    }

    #[tokio::test]
    async fn test_update_bytes_used_unknown_credential() {
        let (store, _temp) = test_store();
        let err = store.update_bytes_used("ghost", 1).await.unwrap_err();
        assert!(matches!(err, StorageError::UnknownCredential { .. }));
    }

    #[tokio::test]
    async fn test_bucket_directory() {
        let (store, _temp) = test_store();

        assert!(!store.bucket_exists("owner-a", "photos").await.unwrap());

        store
            .create_bucket(&BucketRecord::new("owner-a".to_string(), "photos".to_string()))
            .await
            .unwrap();
        store
            .create_bucket(&BucketRecord::new("owner-a".to_string(), "backups".to_string()))
            .await
            .unwrap();
        store
            .create_bucket(&BucketRecord::new("owner-b".to_string(), "photos".to_string()))
            .await
            .unwrap();

        assert!(store.bucket_exists("owner-a", "photos").await.unwrap());
        assert!(store.bucket_exists("owner-b", "photos").await.unwrap());
        assert!(!store.bucket_exists("owner-b", "backups").await.unwrap());

        // Listing is scoped to the owner, never across tenants.
        let buckets = store.list_buckets("owner-a").await.unwrap();
        assert_eq!(buckets, vec!["backups".to_string(), "photos".to_string()]);

        let buckets_b = store.list_buckets("owner-b").await.unwrap();
        assert_eq!(buckets_b, vec!["photos".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_bucket_rejected() {
        let (store, _temp) = test_store();

        let record = BucketRecord::new("owner-a".to_string(), "photos".to_string());
        store.create_bucket(&record).await.unwrap();

        let err = store.create_bucket(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::BucketAlreadyExists { .. }));
    }
}
