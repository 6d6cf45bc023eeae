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

//! Request authentication.

pub mod signature;

/// Header carrying the claimed access identifier.
pub const ACCESS_ID_HEADER: &str = "x-keel-access-id";
/// Header carrying the claimed request signature (lowercase hex).
pub const SIGNATURE_HEADER: &str = "x-keel-signature";
/// Header carrying the claimed timestamp (unix seconds, decimal).
pub const TIMESTAMP_HEADER: &str = "x-keel-timestamp";

/// The authenticated owner identifier, bound to the request after a
/// successful signature check. This is the sole tenant-scoping key used by
/// downstream components.
#[derive(Debug, Clone)]
pub struct AuthenticatedOwner(pub String);
