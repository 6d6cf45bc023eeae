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

//! Axum HTTP server setup and routing.
//!
//! This module provides the HTTP routing for the Keel gateway: the
//! signature-authenticated data path and the token-guarded admin API.

use axum::{
    extract::DefaultBodyLimit,
    http::{header::HeaderName, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use keel_core::{MetadataStore, ObjectStorageEngine};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::{admin_auth_middleware, auth_middleware, metrics_middleware};

/// Default maximum upload size (1GB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 1024 * 1024 * 1024;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Object storage engine.
    pub engine: ObjectStorageEngine,
    /// Metadata store (credentials and bucket directory).
    pub metadata: Arc<dyn MetadataStore>,
    /// Shared admin capability token.
    pub admin_token: String,
    /// Maximum upload size in bytes.
    pub max_upload_size: usize,
    /// Prometheus metrics handle for rendering `/metrics` endpoint.
    pub prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        engine: ObjectStorageEngine,
        metadata: Arc<dyn MetadataStore>,
        admin_token: String,
    ) -> Self {
        Self {
            engine,
            metadata,
            admin_token,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            prometheus_handle: None,
        }
    }

    /// Sets a custom max upload size.
    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    /// Sets the Prometheus handle for rendering metrics.
    pub fn with_prometheus_handle(
        mut self,
        handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        self.prometheus_handle = Some(handle);
        self
    }
}

/// Creates the main router with all gateway and admin endpoints.
///
/// # Data-path routing (signature-authenticated)
///
/// - `GET /` - ListBuckets
/// - `PUT /{bucket}/{key}` - PutObject
/// - `GET /{bucket}/{key}` - GetObject
/// - `DELETE /{bucket}/{key}` - DeleteObject
///
/// # Admin API routing (shared-token authentication)
///
/// - `POST /api/admin/credentials` - Issue a credential pair
/// - `GET /api/admin/credentials/{access_id}` - Credential plan and usage
/// - `PUT /api/admin/buckets/{owner}/{name}` - Create a bucket
///
/// # Observability (no auth)
///
/// - `GET /metrics` - Prometheus exposition
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for browser-based clients.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any)
        .expose_headers([
            HeaderName::from_static("x-keel-fingerprint"),
            HeaderName::from_static("x-keel-request-id"),
        ]);

    // Data-path router: every route passes the signature middleware
    // exactly once before any handler runs.
    let data_router = Router::new()
        .route("/", get(handlers::list_buckets))
        // Object operations (keys can contain slashes, so we use catch-all)
        .route("/:bucket/*key", put(handlers::put_object))
        .route("/:bucket/*key", get(handlers::get_object))
        .route("/:bucket/*key", delete(handlers::delete_object))
        // CORS before auth for preflight requests
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin provisioning router with shared-token authentication.
    let admin_router = Router::new()
        .route("/credentials", post(handlers::admin::create_credential))
        .route(
            "/credentials/:access_id",
            get(handlers::admin::get_credential),
        )
        .route(
            "/buckets/:owner/:name",
            put(handlers::admin::create_bucket),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .nest("/api/admin", admin_router)
        // Observability endpoint (no auth required)
        .route("/metrics", get(handlers::stats::prometheus_metrics))
        .merge(data_router)
        // Request logging
        .layer(TraceLayer::new_for_http())
        // Request count and latency metrics
        .layer(middleware::from_fn(metrics_middleware))
        // Body size cap for uploads
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .with_state(state)
}
