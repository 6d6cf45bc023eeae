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

//! Keyed request signatures.
//!
//! A request is signed as HMAC-SHA256 over the canonical descriptor
//! `"{METHOD}\n{PATH}\n{TIMESTAMP}"`, hex-encoded, keyed by the
//! credential's secret. Freshness is one-sided: only staleness is checked,
//! timestamps from the future are accepted.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a request timestamp, in seconds.
pub const FRESHNESS_WINDOW_SECS: i64 = 15 * 60;

/// Builds the canonical request descriptor covered by the signature.
///
/// `path` is the full request path including the query string when present.
pub fn canonical_descriptor(method: &str, path: &str, timestamp: &str) -> String {
    format!("{}\n{}\n{}", method, path, timestamp)
}

/// Computes the expected signature for a descriptor: lowercase hex
/// HMAC-SHA256 keyed by the credential secret.
pub fn compute_signature(secret: &str, descriptor: &str) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), descriptor.as_bytes()))
}

/// Verifies a claimed signature against the descriptor in constant time.
///
/// A claim that is not valid hex never matches.
pub fn verify_signature(secret: &str, descriptor: &str, claimed: &str) -> bool {
    let claimed_bytes = match hex::decode(claimed) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let expected = hmac_sha256(secret.as_bytes(), descriptor.as_bytes());
    constant_time_eq(&expected, &claimed_bytes)
}

/// Returns true iff the timestamp is older than the freshness window.
///
/// `now - timestamp` beyond the window is stale; a negative difference
/// (future timestamp) is not rejected.
pub fn is_expired(timestamp_secs: i64, now_secs: i64) -> bool {
    now_secs - timestamp_secs > FRESHNESS_WINDOW_SECS
}

/// Calculates HMAC-SHA256.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison of byte slices.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_descriptor() {
        assert_eq!(
            canonical_descriptor("PUT", "/photos/cat.jpg", "1700000000"),
            "PUT\n/photos/cat.jpg\n1700000000"
        );
    }

    #[test]
    fn test_signature_roundtrip() {
        let descriptor = canonical_descriptor("GET", "/", "1700000000");
        let sig = compute_signature("secret", &descriptor);
        assert_eq!(sig.len(), 64);
        assert!(verify_signature("secret", &descriptor, &sig));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let descriptor = canonical_descriptor("GET", "/", "1700000000");
        let sig = compute_signature("secret", &descriptor);
        assert!(!verify_signature("other-secret", &descriptor, &sig));
    }

    #[test]
    fn test_tampered_descriptor_rejected() {
        let descriptor = canonical_descriptor("GET", "/photos/a", "1700000000");
        let sig = compute_signature("secret", &descriptor);
        let tampered = canonical_descriptor("DELETE", "/photos/a", "1700000000");
        assert!(!verify_signature("secret", &tampered, &sig));
    }

    #[test]
    fn test_non_hex_claim_rejected() {
        let descriptor = canonical_descriptor("GET", "/", "1700000000");
        assert!(!verify_signature("secret", &descriptor, "not-hex!"));
        assert!(!verify_signature("secret", &descriptor, ""));
    }

    #[test]
    fn test_freshness_window() {
        let now = 1_700_000_000;
        assert!(!is_expired(now, now));
        assert!(!is_expired(now - FRESHNESS_WINDOW_SECS, now));
        assert!(is_expired(now - FRESHNESS_WINDOW_SECS - 1, now));
    }

    #[test]
    fn test_future_timestamps_accepted() {
        let now = 1_700_000_000;
        assert!(!is_expired(now + 3600, now));
    }

    #[test]
    fn test_signature_deterministic() {
        let descriptor = canonical_descriptor("PUT", "/b/k", "1700000000");
        assert_eq!(
            compute_signature("secret", &descriptor),
            compute_signature("secret", &descriptor)
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }
}
