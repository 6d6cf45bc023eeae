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

//! Signature authentication integration tests.
//!
//! Runs the full authentication protocol over in-process requests:
//! credential lookup, freshness validation, and keyed-signature
//! verification. Signature authentication stays ENABLED here.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use keel_api::auth::signature::{canonical_descriptor, compute_signature, FRESHNESS_WINDOW_SECS};
use keel_api::{create_router, AppState};
use keel_core::{
    BucketRecord, Credential, FsByteStore, MetadataStore, ObjectStorageEngine, PlanTier,
    RedbMetadataStore,
};
use std::sync::{Arc, Once};
use tempfile::TempDir;
use tower::ServiceExt;

const OWNER: &str = "KLAKsigowner00000000";
const SECRET: &str = "sig-test-secret-sig-test-secret-sig-tes";

static INIT: Once = Once::new();

fn init_test_env() {
    // Make sure a leaked dev bypass never weakens these tests.
    INIT.call_once(|| {
        std::env::remove_var("KEEL_DISABLE_AUTH");
    });
}

async fn create_test_app() -> (Router, Arc<RedbMetadataStore>, TempDir) {
    init_test_env();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let metadata = Arc::new(
        RedbMetadataStore::new(&temp_dir.path().join("metadata.redb"))
            .expect("Failed to create metadata store"),
    );
    let store = Arc::new(
        FsByteStore::new(temp_dir.path().join("objects"))
            .await
            .expect("Failed to create byte store"),
    );

    metadata
        .create_credential(&Credential::new(
            OWNER.to_string(),
            SECRET.to_string(),
            PlanTier::Starter,
        ))
        .await
        .expect("Failed to create credential");
    metadata
        .create_bucket(&BucketRecord::new(OWNER.to_string(), "photos".to_string()))
        .await
        .expect("Failed to create bucket");

    let engine = ObjectStorageEngine::new(store, metadata.clone());
    let state = AppState::new(engine, metadata.clone(), "admin".to_string());
    (create_router(state), metadata, temp_dir)
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Builds a request signed with `secret` at the given timestamp.
fn signed_request_at(
    method: &str,
    path: &str,
    access_id: &str,
    secret: &str,
    timestamp_secs: i64,
    body: Body,
) -> Request<Body> {
    let timestamp = timestamp_secs.to_string();
    let descriptor = canonical_descriptor(method, path, &timestamp);
    let signature = compute_signature(secret, &descriptor);

    Request::builder()
        .method(method)
        .uri(path)
        .header("x-keel-access-id", access_id)
        .header("x-keel-signature", signature)
        .header("x-keel-timestamp", timestamp)
        .body(body)
        .unwrap()
}

/// Builds a request signed with `secret` at the current time.
fn signed_request(
    method: &str,
    path: &str,
    access_id: &str,
    secret: &str,
    body: Body,
) -> Request<Body> {
    signed_request_at(
        method,
        path,
        access_id,
        secret,
        chrono::Utc::now().timestamp(),
        body,
    )
}

async fn error_code(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    body["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_correctly_signed_request_authenticates() {
    let (app, _metadata, _temp) = create_test_app().await;

    let response = send(
        &app,
        signed_request("PUT", "/photos/pic.jpg", OWNER, SECRET, Body::from("data")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        signed_request("GET", "/photos/pic.jpg", OWNER, SECRET, Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"data");
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let (app, _metadata, _temp) = create_test_app().await;

    let response = send(
        &app,
        signed_request("GET", "/", OWNER, "some-other-secret", Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "InvalidSignature");
}

#[tokio::test]
async fn test_stale_timestamp_rejected() {
    let (app, _metadata, _temp) = create_test_app().await;

    let stale = chrono::Utc::now().timestamp() - FRESHNESS_WINDOW_SECS - 60;
    let response = send(
        &app,
        signed_request_at("GET", "/", OWNER, SECRET, stale, Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "RequestExpired");
}

#[tokio::test]
async fn test_future_timestamp_accepted() {
    let (app, _metadata, _temp) = create_test_app().await;

    // Freshness is one-sided: only staleness is rejected.
    let future = chrono::Utc::now().timestamp() + 3600;
    let response = send(
        &app,
        signed_request_at("GET", "/", OWNER, SECRET, future, Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_headers_rejected() {
    let (app, _metadata, _temp) = create_test_app().await;

    // No auth headers at all.
    let response = send(
        &app,
        Request::builder().method("GET").uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "MissingCredentials");

    // Signature present but timestamp absent.
    let response = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/")
            .header("x-keel-access-id", OWNER)
            .header("x-keel-signature", "deadbeef")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "MissingCredentials");
}

#[tokio::test]
async fn test_unknown_identity_rejected() {
    let (app, _metadata, _temp) = create_test_app().await;

    let response = send(
        &app,
        signed_request("GET", "/", "KLAKneverissued00000", SECRET, Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "UnknownIdentity");
}

#[tokio::test]
async fn test_signature_covers_method_and_path() {
    let (app, _metadata, _temp) = create_test_app().await;

    send(
        &app,
        signed_request("PUT", "/photos/pic.jpg", OWNER, SECRET, Body::from("data")),
    )
    .await;

    // A GET signature replayed as DELETE must not verify.
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let descriptor = canonical_descriptor("GET", "/photos/pic.jpg", &timestamp);
    let signature = compute_signature(SECRET, &descriptor);
    let response = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/photos/pic.jpg")
            .header("x-keel-access-id", OWNER)
            .header("x-keel-signature", signature)
            .header("x-keel-timestamp", timestamp)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(response).await, "InvalidSignature");
}

#[tokio::test]
async fn test_authenticated_identity_scopes_tenancy() {
    let (app, metadata, _temp) = create_test_app().await;

    send(
        &app,
        signed_request("PUT", "/photos/pic.jpg", OWNER, SECRET, Body::from("data")),
    )
    .await;

    // Provision a second tenant with a same-named bucket.
    let other_id = "KLAKother00000000000";
    let other_secret = "other-tenant-secret-other-tenant-secret";
    metadata
        .create_credential(&Credential::new(
            other_id.to_string(),
            other_secret.to_string(),
            PlanTier::Starter,
        ))
        .await
        .unwrap();
    metadata
        .create_bucket(&BucketRecord::new(other_id.to_string(), "photos".to_string()))
        .await
        .unwrap();

    // A fully authenticated second tenant sees only its own namespace.
    let response = send(
        &app,
        signed_request("GET", "/photos/pic.jpg", other_id, other_secret, Body::empty()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await, "ObjectNotFound");
}
