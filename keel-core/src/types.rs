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

//! Shared record types for credentials and buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Plan tier a credential is provisioned on.
///
/// The tier determines the owner's storage limit. The mapping is fixed at
/// compile time; there is no per-tenant override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Entry tier: 1 GiB.
    Starter,
    /// Standard tier: 10 GiB.
    Standard,
    /// Premium tier: 100 GiB.
    Premium,
}

impl PlanTier {
    /// Returns the storage limit for this tier in bytes.
    pub fn limit_bytes(&self) -> u64 {
        match self {
            PlanTier::Starter => 1024 * 1024 * 1024,
            PlanTier::Standard => 10 * 1024 * 1024 * 1024,
            PlanTier::Premium => 100 * 1024 * 1024 * 1024,
        }
    }
}

/// Credential record: the unit of authentication and quota.
///
/// The access id is the tenant's identity; every bucket and object the
/// tenant owns is scoped under it. `bytes_used` is mutated only by the
/// quota ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Unique opaque access identifier.
    pub access_id: String,
    /// Signing secret. Never transmitted after issuance.
    pub secret: String,
    /// Plan tier, determines the storage limit.
    pub plan: PlanTier,
    /// Cumulative bytes stored under this credential.
    pub bytes_used: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (bumped by quota mutations).
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a fresh credential with zero usage.
    pub fn new(access_id: String, secret: String, plan: PlanTier) -> Self {
        let now = Utc::now();
        Self {
            access_id,
            secret,
            plan,
            bytes_used: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Bucket directory record.
///
/// (name, owner) is unique; a bucket belongs to exactly one credential and
/// is never renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRecord {
    /// Bucket name, unique per owner (not globally).
    pub name: String,
    /// Owning access id.
    pub owner: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BucketRecord {
    /// Creates a bucket record owned by `owner`.
    pub fn new(owner: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            name,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}
