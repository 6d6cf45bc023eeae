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

//! Configuration management for the Keel server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings (bind address, TLS, upload cap)
    pub server: ServerConfig,
    /// Storage paths (object root, metadata database)
    pub storage: StorageConfig,
    /// Security settings (admin provisioning token)
    pub security: SecurityConfig,
    /// Metrics and monitoring configuration
    pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:9600")
    pub bind: String,
    /// Maximum upload size in bytes.
    /// Can be set via KEEL_MAX_UPLOAD_SIZE environment variable
    /// (e.g., "1GB", "100MB", "1024KB").
    pub max_upload_size: usize,
    /// TLS configuration for HTTPS support.
    pub tls: TlsConfig,
}

/// TLS/HTTPS configuration.
///
/// TLS is disabled by default. To enable it, set the `KEEL_TLS_CERT` and
/// `KEEL_TLS_KEY` environment variables to PEM-encoded certificate and
/// private key files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled.
    /// Automatically set to true when both cert_path and key_path are provided.
    pub enabled: bool,
    /// Path to PEM-encoded certificate file.
    /// Can be set via KEEL_TLS_CERT environment variable.
    pub cert_path: Option<PathBuf>,
    /// Path to PEM-encoded private key file.
    /// Can be set via KEEL_TLS_KEY environment variable.
    pub key_path: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        let cert_path = std::env::var("KEEL_TLS_CERT").ok().map(PathBuf::from);
        let key_path = std::env::var("KEEL_TLS_KEY").ok().map(PathBuf::from);

        // Enable TLS only if both cert and key are provided
        let enabled = cert_path.is_some() && key_path.is_some();

        Self {
            enabled,
            cert_path,
            key_path,
        }
    }
}

impl TlsConfig {
    /// Validates TLS configuration.
    ///
    /// Returns an error if TLS is enabled but certificate or key paths are
    /// missing.
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled {
            if self.cert_path.is_none() {
                return Err("TLS enabled but KEEL_TLS_CERT is not set".to_string());
            }
            if self.key_path.is_none() {
                return Err("TLS enabled but KEEL_TLS_KEY is not set".to_string());
            }
        }
        Ok(())
    }
}

/// Parses a size string like "10GB", "100MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());

    let (num_str, suffix) = s.split_at(num_end);
    let suffix = suffix.trim();

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        _ => return Err(format!("Unknown size suffix: {}", suffix)),
    };

    Ok((num * multiplier as f64) as usize)
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for object data
    pub data_path: PathBuf,
    /// Path to the metadata database
    pub metadata_path: PathBuf,
}

/// Security configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared token for the admin provisioning API.
    /// Can be set via KEEL_ADMIN_TOKEN environment variable.
    pub admin_token: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    pub prometheus_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            prometheus_enabled: std::env::var("KEEL_METRICS_ENABLED")
                .map(|s| s.to_lowercase() == "true" || s == "1")
                .unwrap_or(true),
        }
    }
}

impl Config {
    /// Loads configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::default())
    }
}

impl Default for Config {
    fn default() -> Self {
        // Use temp directory for development, can be overridden via KEEL_DATA_DIR
        let data_dir = std::env::var("KEEL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("keel-data"));

        Self {
            server: ServerConfig {
                bind: std::env::var("KEEL_BIND").unwrap_or_else(|_| "127.0.0.1:9600".to_string()),
                max_upload_size: std::env::var("KEEL_MAX_UPLOAD_SIZE")
                    .ok()
                    .and_then(|s| parse_size(&s).ok())
                    .unwrap_or(keel_api::DEFAULT_MAX_UPLOAD_SIZE),
                tls: TlsConfig::default(),
            },
            storage: StorageConfig {
                data_path: data_dir.join("objects"),
                metadata_path: data_dir.join("metadata.redb"),
            },
            security: SecurityConfig {
                // Generate a random dev token if not set; operators must
                // configure KEEL_ADMIN_TOKEN for any real deployment.
                admin_token: std::env::var("KEEL_ADMIN_TOKEN")
                    .unwrap_or_else(|_| format!("dev-{}", nanoid::nanoid!(24))),
            },
            metrics: MetricsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("100mb").unwrap(), 100 * 1024 * 1024);
        assert_eq!(parse_size("2GB").unwrap(), 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1TB").is_err()); // TB not supported
    }

    #[test]
    fn test_tls_validation() {
        let disabled = TlsConfig {
            enabled: false,
            cert_path: None,
            key_path: None,
        };
        assert!(disabled.validate().is_ok());

        let complete = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: Some(PathBuf::from("/path/to/key.pem")),
        };
        assert!(complete.validate().is_ok());

        let missing_key = TlsConfig {
            enabled: true,
            cert_path: Some(PathBuf::from("/path/to/cert.pem")),
            key_path: None,
        };
        let result = missing_key.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("KEEL_TLS_KEY"));
    }
}
