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

//! Bucket name and object key validation.
//!
//! Object keys become path segments under the storage root, so every key is
//! validated before resolution: no `.`/`..`/empty segments, no NUL or
//! backslash, no leading or trailing slash.

use crate::error::StorageError;

/// Maximum object key length in bytes.
pub const MAX_KEY_LENGTH: usize = 1024;

/// Validates a bucket name at provisioning time.
///
/// Names are 3-63 characters of lowercase alphanumerics and `-`, starting
/// and ending with an alphanumeric.
pub fn validate_bucket_name(name: &str) -> Result<(), StorageError> {
    if name.len() < 3 || name.len() > 63 {
        return Err(StorageError::InvalidBucketName(format!(
            "name must be 3-63 characters, got {}",
            name.len()
        )));
    }

    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(StorageError::InvalidBucketName(
            "name may contain only lowercase letters, digits, and '-'".to_string(),
        ));
    }

    let first = name.chars().next().unwrap_or('-');
    let last = name.chars().last().unwrap_or('-');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(StorageError::InvalidBucketName(
            "name must start and end with a letter or digit".to_string(),
        ));
    }

    Ok(())
}

/// Validates an object key before namespace resolution.
pub fn validate_object_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidKey(format!(
            "key exceeds {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.contains('\0') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "key contains a forbidden character".to_string(),
        ));
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(StorageError::InvalidKey(
            "key must not start or end with '/'".to_string(),
        ));
    }

    for segment in key.split('/') {
        if segment.is_empty() {
            return Err(StorageError::InvalidKey(
                "key contains an empty path segment".to_string(),
            ));
        }
        if segment == "." || segment == ".." {
            return Err(StorageError::InvalidKey(
                "key contains a relative path segment".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bucket_names() {
        assert!(validate_bucket_name("photos").is_ok());
        assert!(validate_bucket_name("my-bucket-01").is_ok());
        assert!(validate_bucket_name("abc").is_ok());
    }

    #[test]
    fn test_invalid_bucket_names() {
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
        assert!(validate_bucket_name("My-Bucket").is_err());
        assert!(validate_bucket_name("-leading").is_err());
        assert!(validate_bucket_name("trailing-").is_err());
        assert!(validate_bucket_name("under_score").is_err());
        assert!(validate_bucket_name("dot.name").is_err());
    }

    #[test]
    fn test_valid_object_keys() {
        assert!(validate_object_key("file.txt").is_ok());
        assert!(validate_object_key("nested/path/to/file.bin").is_ok());
        assert!(validate_object_key("with spaces and (parens)").is_ok());
        assert!(validate_object_key("dots.in.name/more.dots").is_ok());
    }

    #[test]
    fn test_traversal_keys_rejected() {
        assert!(validate_object_key("../escape").is_err());
        assert!(validate_object_key("a/../../b").is_err());
        assert!(validate_object_key("a/./b").is_err());
        assert!(validate_object_key("/absolute").is_err());
        assert!(validate_object_key("trailing/").is_err());
        assert!(validate_object_key("double//slash").is_err());
    }

    #[test]
    fn test_malformed_keys_rejected() {
        assert!(validate_object_key("").is_err());
        assert!(validate_object_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
        assert!(validate_object_key("nul\0byte").is_err());
        assert!(validate_object_key("back\\slash").is_err());
    }

    #[test]
    fn test_key_at_max_length_allowed() {
        assert!(validate_object_key(&"k".repeat(MAX_KEY_LENGTH)).is_ok());
    }
}
