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

//! Admin provisioning handlers.
//!
//! These endpoints are the only producers of credential and bucket records.
//! They sit behind the shared-token admin middleware, outside the data-path
//! trust boundary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use keel_core::storage::validate_bucket_name;
use keel_core::types::{BucketRecord, Credential, PlanTier};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::rest::errors::ApiError;
use crate::server::AppState;

/// Request body for credential issuance.
#[derive(Debug, Deserialize)]
pub struct CreateCredentialRequest {
    /// Plan tier to provision the credential on.
    pub plan: PlanTier,
}

/// Response body for credential issuance.
///
/// The secret is returned here once and never again.
#[derive(Debug, Serialize)]
pub struct CreateCredentialResponse {
    /// Issued access identifier.
    pub access_id: String,
    /// Issued signing secret.
    pub secret: String,
    /// Provisioned plan tier.
    pub plan: PlanTier,
}

/// Credential record view without the secret.
#[derive(Debug, Serialize)]
pub struct CredentialInfoResponse {
    /// Access identifier.
    pub access_id: String,
    /// Plan tier.
    pub plan: PlanTier,
    /// Cumulative bytes stored under this credential.
    pub bytes_used: u64,
    /// Plan limit in bytes.
    pub limit_bytes: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Response body for bucket creation.
#[derive(Debug, Serialize)]
pub struct CreateBucketResponse {
    /// Owning access id.
    pub owner: String,
    /// Created bucket name.
    pub name: String,
}

/// Issues a fresh credential pair.
///
/// API: POST /api/admin/credentials
pub async fn create_credential(
    State(state): State<AppState>,
    Json(request): Json<CreateCredentialRequest>,
) -> Result<(StatusCode, Json<CreateCredentialResponse>), ApiError> {
    let access_id = format!("KLAK{}", nanoid::nanoid!(20));
    let secret = nanoid::nanoid!(40);

    let credential = Credential::new(access_id.clone(), secret.clone(), request.plan);
    state.metadata.create_credential(&credential).await?;

    info!("Issued credential: access_id={}, plan={:?}", access_id, request.plan);

    Ok((
        StatusCode::CREATED,
        Json(CreateCredentialResponse {
            access_id,
            secret,
            plan: request.plan,
        }),
    ))
}

/// Returns a credential's plan and usage, without the secret.
///
/// API: GET /api/admin/credentials/{access_id}
pub async fn get_credential(
    State(state): State<AppState>,
    Path(access_id): Path<String>,
) -> Result<Json<CredentialInfoResponse>, ApiError> {
    let credential = state
        .metadata
        .get_credential(&access_id)
        .await?
        .ok_or(ApiError::UnknownIdentity)?;

    Ok(Json(CredentialInfoResponse {
        access_id: credential.access_id,
        plan: credential.plan,
        bytes_used: credential.bytes_used,
        limit_bytes: credential.plan.limit_bytes(),
        created_at: credential.created_at,
    }))
}

/// Creates a bucket for an existing credential.
///
/// API: PUT /api/admin/buckets/{owner}/{name}
pub async fn create_bucket(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
) -> Result<(StatusCode, Json<CreateBucketResponse>), ApiError> {
    validate_bucket_name(&name)?;

    // Buckets can only hang off a provisioned credential.
    state
        .metadata
        .get_credential(&owner)
        .await?
        .ok_or(ApiError::UnknownIdentity)?;

    let record = BucketRecord::new(owner.clone(), name.clone());
    state.metadata.create_bucket(&record).await?;

    info!("Created bucket: owner={}, name={}", owner, name);

    Ok((StatusCode::CREATED, Json(CreateBucketResponse { owner, name })))
}
