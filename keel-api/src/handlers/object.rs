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

//! Object operation handlers.
//!
//! Implements the data-path object operations:
//! - PutObject (PUT /{bucket}/{key})
//! - GetObject (GET /{bucket}/{key})
//! - DeleteObject (DELETE /{bucket}/{key})
//!
//! Every handler runs after the authentication middleware and scopes all
//! access by the authenticated owner.

use axum::{
    body::{Body, Bytes},
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use keel_core::storage::fingerprint;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::AuthenticatedOwner;
use crate::rest::errors::ApiError;
use crate::server::AppState;

/// Header carrying the content fingerprint on write and read responses.
pub const FINGERPRINT_HEADER: &str = "x-keel-fingerprint";

/// Response body for a successful PutObject.
#[derive(Debug, Serialize)]
pub struct PutObjectResponse {
    /// Bucket the object was written to.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Stored size in bytes.
    pub size: u64,
    /// Content fingerprint of the stored bytes.
    pub fingerprint: String,
}

/// Uploads an object, fully replacing any prior content at the key.
///
/// API: PUT /{bucket}/{key}
///
/// # Returns
///
/// - 200 OK with the fingerprint in the body and `x-keel-fingerprint`
/// - 403 if the write would exceed the owner's plan limit
/// - 404 if the bucket doesn't exist
pub async fn put_object(
    State(state): State<AppState>,
    owner: Option<Extension<AuthenticatedOwner>>,
    Path((bucket, key)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let owner = require_owner(owner)?;
    info!(
        "PutObject: owner={}, bucket={}, key={}, size={}",
        owner,
        bucket,
        key,
        body.len()
    );

    let digest = state.engine.put_object(&owner, &bucket, &key, &body).await?;

    let response = Json(PutObjectResponse {
        bucket,
        key,
        size: body.len() as u64,
        fingerprint: digest.clone(),
    });
    Ok(([(FINGERPRINT_HEADER, digest)], response).into_response())
}

/// Downloads an object's stored bytes, unmodified.
///
/// API: GET /{bucket}/{key}
///
/// # Returns
///
/// - 200 OK with the raw bytes and `x-keel-fingerprint`
/// - 404 if the bucket or object doesn't exist
pub async fn get_object(
    State(state): State<AppState>,
    owner: Option<Extension<AuthenticatedOwner>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let owner = require_owner(owner)?;
    debug!("GetObject: owner={}, bucket={}, key={}", owner, bucket, key);

    let data = state.engine.get_object(&owner, &bucket, &key).await?;
    let digest = fingerprint(&data);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, data.len())
        .header(FINGERPRINT_HEADER, digest)
        .body(Body::from(data))
        .unwrap();
    Ok(response)
}

/// Deletes an object and releases its size back to the owner's quota.
///
/// API: DELETE /{bucket}/{key}
///
/// # Returns
///
/// - 204 No Content on success
/// - 404 if the bucket or object doesn't exist
pub async fn delete_object(
    State(state): State<AppState>,
    owner: Option<Extension<AuthenticatedOwner>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let owner = require_owner(owner)?;
    info!("DeleteObject: owner={}, bucket={}, key={}", owner, bucket, key);

    state.engine.delete_object(&owner, &bucket, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Extracts the authenticated owner bound by the auth middleware.
pub(crate) fn require_owner(
    owner: Option<Extension<AuthenticatedOwner>>,
) -> Result<String, ApiError> {
    owner.map(|Extension(AuthenticatedOwner(id))| id).ok_or(ApiError::MissingCredentials)
}
