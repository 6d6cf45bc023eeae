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

//! Authentication middleware for the data path.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::auth::signature::{canonical_descriptor, is_expired, verify_signature};
use crate::auth::{AuthenticatedOwner, ACCESS_ID_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::rest::errors::ApiError;
use crate::server::AppState;

/// Authentication middleware that verifies the keyed request signature.
///
/// Every data-path request passes through this exactly once; on success the
/// authenticated owner id is stored in request extensions and is the only
/// tenant-scoping key downstream.
///
/// For development/testing, `KEEL_DISABLE_AUTH=1` bypasses verification and
/// trusts the claimed access id verbatim.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_disabled =
        std::env::var("KEEL_DISABLE_AUTH").unwrap_or_default().parse::<u8>().unwrap_or(0) == 1;

    if auth_disabled {
        if let Some(claimed) = header_str(request.headers(), ACCESS_ID_HEADER) {
            let owner = claimed.to_string();
            request.extensions_mut().insert(AuthenticatedOwner(owner));
        }
        return next.run(request).await;
    }

    match authenticate(&state, &request).await {
        Ok(owner) => {
            request.extensions_mut().insert(AuthenticatedOwner(owner));
            next.run(request).await
        }
        Err(e) => {
            warn!("Authentication failed: {}", e);
            e.into_response()
        }
    }
}

/// Runs the authentication protocol against the request headers.
///
/// Lookup-only; never mutates state.
async fn authenticate(state: &AppState, request: &Request) -> Result<String, ApiError> {
    let headers = request.headers();
    let access_id =
        header_str(headers, ACCESS_ID_HEADER).ok_or(ApiError::MissingCredentials)?;
    let claimed_signature =
        header_str(headers, SIGNATURE_HEADER).ok_or(ApiError::MissingCredentials)?;
    let timestamp = header_str(headers, TIMESTAMP_HEADER).ok_or(ApiError::MissingCredentials)?;

    let credential = state
        .metadata
        .get_credential(access_id)
        .await
        .map_err(ApiError::from)?
        .ok_or(ApiError::UnknownIdentity)?;

    let timestamp_secs: i64 = timestamp.parse().map_err(|_| ApiError::RequestExpired)?;
    if is_expired(timestamp_secs, chrono::Utc::now().timestamp()) {
        return Err(ApiError::RequestExpired);
    }

    // The signature covers the full path including the query string.
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());
    let descriptor = canonical_descriptor(request.method().as_str(), path, timestamp);

    if !verify_signature(&credential.secret, &descriptor, claimed_signature) {
        return Err(ApiError::InvalidSignature);
    }

    Ok(credential.access_id)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
