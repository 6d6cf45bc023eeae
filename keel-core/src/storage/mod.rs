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

//! Object storage engine implementation.

pub mod engine;
pub mod fs_store;
pub mod keys;
pub mod store;

pub use engine::{fingerprint, ObjectStorageEngine};
pub use fs_store::FsByteStore;
pub use keys::{validate_bucket_name, validate_object_key};
pub use store::ByteStore;
