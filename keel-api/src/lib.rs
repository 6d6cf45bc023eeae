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

//! Keel API layer - HTTP gateway.
//!
//! This crate provides the HTTP surface for Keel, including:
//! - Keyed-signature request authentication
//! - HTTP handlers for objects, buckets, and admin provisioning
//! - Middleware for auth, admin auth, and metrics

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod server;

pub use auth::AuthenticatedOwner;
pub use rest::errors::ApiError;
pub use server::{create_router, AppState, DEFAULT_MAX_UPLOAD_SIZE};
