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

//! Bucket operation handlers.

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::auth::AuthenticatedOwner;
use crate::handlers::object::require_owner;
use crate::rest::errors::ApiError;
use crate::server::AppState;

/// Response body for ListBuckets.
#[derive(Debug, Serialize)]
pub struct ListBucketsResponse {
    /// The authenticated owner.
    pub owner: String,
    /// Bucket names owned by the authenticated identity.
    pub buckets: Vec<String>,
}

/// Lists all buckets owned by the authenticated identity.
///
/// API: GET /
///
/// No pagination; directory order.
pub async fn list_buckets(
    State(state): State<AppState>,
    owner: Option<Extension<AuthenticatedOwner>>,
) -> Result<Json<ListBucketsResponse>, ApiError> {
    let owner = require_owner(owner)?;
    debug!("ListBuckets: owner={}", owner);

    let buckets = state.engine.list_buckets(&owner).await?;
    Ok(Json(ListBucketsResponse { owner, buckets }))
}
