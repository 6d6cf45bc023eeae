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

//! Shared-token authentication middleware for the admin API.
//!
//! Provisioning is a capability-based trust boundary: a static shared token
//! grants it, and the data-path core never calls into it.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::server::AppState;

/// Header carrying the admin capability token.
pub const ADMIN_TOKEN_HEADER: &str = "x-keel-admin-token";

/// Admin authentication middleware.
///
/// Compares the presented token against the configured one in constant
/// time.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = match request.headers().get(ADMIN_TOKEN_HEADER) {
        Some(header) => match header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return error_response(StatusCode::BAD_REQUEST, "Invalid admin token header");
            }
        },
        None => {
            return error_response(StatusCode::UNAUTHORIZED, "Missing admin token header");
        }
    };

    if !token_matches(presented, &state.admin_token) {
        warn!("Admin authentication failed: token mismatch");
        return error_response(StatusCode::FORBIDDEN, "Invalid admin token");
    }

    next.run(request).await
}

/// Constant-time token comparison.
fn token_matches(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Helper to create error response.
fn error_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": message,
    }));
    (status, body).into_response()
}
