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

//! Gateway error types and JSON responses.
//!
//! Every error is serialized as
//! `{"error": {"code", "message", "request_id"}}` with a per-response
//! request id.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use keel_core::StorageError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Gateway API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more authentication headers are absent.
    #[error("Missing authentication headers")]
    MissingCredentials,

    /// No credential record for the claimed identity.
    #[error("Unknown identity")]
    UnknownIdentity,

    /// The request timestamp is older than the freshness window.
    #[error("Request timestamp is outside the freshness window")]
    RequestExpired,

    /// The claimed signature does not match the computed one.
    #[error("The request signature does not match")]
    InvalidSignature,

    /// The bucket does not exist for this owner.
    #[error("The specified bucket does not exist")]
    BucketNotFound,

    /// Nothing is stored at the key.
    #[error("The specified object does not exist")]
    ObjectNotFound,

    /// The write would exceed the owner's plan limit.
    #[error("Storage limit exceeded: {0}")]
    StorageLimitExceeded(String),

    /// The (owner, bucket) pair already exists.
    #[error("The bucket already exists for this owner")]
    BucketAlreadyExists,

    /// The access id is already taken.
    #[error("A credential with this access id already exists")]
    CredentialAlreadyExists,

    /// The request is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing byte store failure.
    #[error("Backing store failure: {0}")]
    BackingStoreFailure(String),

    /// Metadata store failure.
    #[error("Metadata store failure: {0}")]
    MetadataStoreFailure(String),
}

impl ApiError {
    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingCredentials => "MissingCredentials",
            ApiError::UnknownIdentity => "UnknownIdentity",
            ApiError::RequestExpired => "RequestExpired",
            ApiError::InvalidSignature => "InvalidSignature",
            ApiError::BucketNotFound => "BucketNotFound",
            ApiError::ObjectNotFound => "ObjectNotFound",
            ApiError::StorageLimitExceeded(_) => "StorageLimitExceeded",
            ApiError::BucketAlreadyExists => "BucketAlreadyExists",
            ApiError::CredentialAlreadyExists => "CredentialAlreadyExists",
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::BackingStoreFailure(_) => "BackingStoreFailure",
            ApiError::MetadataStoreFailure(_) => "MetadataStoreFailure",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ApiError::UnknownIdentity => StatusCode::FORBIDDEN,
            ApiError::RequestExpired => StatusCode::FORBIDDEN,
            ApiError::InvalidSignature => StatusCode::FORBIDDEN,
            ApiError::BucketNotFound => StatusCode::NOT_FOUND,
            ApiError::ObjectNotFound => StatusCode::NOT_FOUND,
            ApiError::StorageLimitExceeded(_) => StatusCode::FORBIDDEN,
            ApiError::BucketAlreadyExists => StatusCode::CONFLICT,
            ApiError::CredentialAlreadyExists => StatusCode::CONFLICT,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BackingStoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MetadataStoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BucketNotFound { .. } => ApiError::BucketNotFound,
            StorageError::ObjectNotFound { .. } => ApiError::ObjectNotFound,
            StorageError::QuotaExceeded { .. } => ApiError::StorageLimitExceeded(err.to_string()),
            StorageError::UnknownCredential { .. } => ApiError::UnknownIdentity,
            StorageError::BucketAlreadyExists { .. } => ApiError::BucketAlreadyExists,
            StorageError::CredentialAlreadyExists { .. } => ApiError::CredentialAlreadyExists,
            StorageError::InvalidKey(reason) => ApiError::InvalidRequest(reason),
            StorageError::InvalidBucketName(reason) => ApiError::InvalidRequest(reason),
            StorageError::Io(e) => ApiError::BackingStoreFailure(e.to_string()),
            StorageError::Metadata(e) => ApiError::MetadataStoreFailure(e),
            StorageError::Serialization(e) => ApiError::MetadataStoreFailure(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "request_id": request_id,
            }
        }));

        let mut response = (self.status_code(), body).into_response();
        response.headers_mut().insert(
            "x-keel-request-id",
            request_id.parse().unwrap_or_else(|_| header::HeaderValue::from_static("invalid")),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::MissingCredentials.code(), "MissingCredentials");
        assert_eq!(ApiError::InvalidSignature.code(), "InvalidSignature");
        assert_eq!(ApiError::BucketNotFound.code(), "BucketNotFound");
        assert_eq!(
            ApiError::StorageLimitExceeded("over".to_string()).code(),
            "StorageLimitExceeded"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidSignature.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::ObjectNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::StorageLimitExceeded("over".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::MetadataStoreFailure("down".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_mapping() {
        let err: ApiError = StorageError::QuotaExceeded {
            requested: 50,
            used: 60,
            limit: 100,
        }
        .into();
        assert!(matches!(err, ApiError::StorageLimitExceeded(_)));

        let err: ApiError = StorageError::ObjectNotFound {
            key: "k".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::ObjectNotFound));

        let err: ApiError = StorageError::InvalidKey("bad".to_string()).into();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
