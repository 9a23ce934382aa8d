// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! # Runtime Configuration
//!
//! All gateway configuration is loaded from the environment exactly once at
//! startup into an immutable [`GatewayConfig`] value, which is then passed
//! into each component at construction time. Nothing reads the environment
//! after startup, so tests can build arbitrary configurations directly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GATEWAY_USERNAME` | The single configured login name | `admin` |
//! | `GATEWAY_PASSWORD_SHA256` | Hex SHA-256 of the login password | Required |
//! | `GATEWAY_TOKEN_SECRET` | HMAC secret for session token signing | Required |
//! | `GATEWAY_ENVELOPE_KEY` | Hex 32-byte AES-256-GCM pre-shared key | Required |
//! | `GATEWAY_SESSION_TTL_SECS` | Session token lifetime in seconds | `3600` |
//! | `GATEWAY_MAX_ENVELOPE_BYTES` | Ceiling for enveloped payloads | `262144000` (250 MiB) |
//! | `DATA_DIR` | Root directory of the object store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Environment variable name for the object store root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default session token lifetime (one hour).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Default ceiling for enveloped payloads (250 MiB).
pub const DEFAULT_MAX_ENVELOPE_BYTES: usize = 250 * 1024 * 1024;

/// Configuration errors raised during startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("{0} is not valid hex")]
    BadHex(&'static str),
    #[error("{0} must decode to exactly {1} bytes")]
    BadLength(&'static str, usize),
    #[error("{0} is not a valid number")]
    BadNumber(&'static str),
}

/// Immutable gateway configuration.
///
/// Holds the single-tenant credentials (username plus password hash, never
/// the password itself), the token signing secret, the envelope key and its
/// published fingerprint, and the operational limits.
#[derive(Clone)]
pub struct GatewayConfig {
    /// The one configured login name.
    pub username: String,
    /// SHA-256 of the configured password.
    pub password_sha256: [u8; 32],
    /// HMAC secret used to sign and verify session tokens.
    pub token_secret: Vec<u8>,
    /// Session token lifetime.
    pub session_ttl: Duration,
    /// Raw AES-256-GCM pre-shared key. Never logged or serialized.
    pub envelope_key: [u8; 32],
    /// Ceiling on enveloped payload size, enforced before decode.
    pub max_envelope_bytes: usize,
    /// Root directory of the backing object store.
    pub data_dir: PathBuf,
}

impl GatewayConfig {
    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let username = env::var("GATEWAY_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let password_sha256 = decode_hex_array::<32>(
            &env::var("GATEWAY_PASSWORD_SHA256")
                .map_err(|_| ConfigError::Missing("GATEWAY_PASSWORD_SHA256"))?,
            "GATEWAY_PASSWORD_SHA256",
        )?;

        let token_secret = env::var("GATEWAY_TOKEN_SECRET")
            .map_err(|_| ConfigError::Missing("GATEWAY_TOKEN_SECRET"))?
            .into_bytes();

        let envelope_key = decode_hex_array::<32>(
            &env::var("GATEWAY_ENVELOPE_KEY")
                .map_err(|_| ConfigError::Missing("GATEWAY_ENVELOPE_KEY"))?,
            "GATEWAY_ENVELOPE_KEY",
        )?;

        let session_ttl = match env::var("GATEWAY_SESSION_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|_| ConfigError::BadNumber("GATEWAY_SESSION_TTL_SECS"))?,
            ),
            Err(_) => DEFAULT_SESSION_TTL,
        };

        let max_envelope_bytes = match env::var("GATEWAY_MAX_ENVELOPE_BYTES") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::BadNumber("GATEWAY_MAX_ENVELOPE_BYTES"))?,
            Err(_) => DEFAULT_MAX_ENVELOPE_BYTES,
        };

        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));

        Ok(Self {
            username,
            password_sha256,
            token_secret,
            session_ttl,
            envelope_key,
            max_envelope_bytes,
            data_dir,
        })
    }

    /// SHA-256 fingerprint of the envelope key.
    ///
    /// Safe to publish and log; clients compare it against the hash of their
    /// own key to detect configuration drift before attempting decryption.
    pub fn envelope_key_fingerprint(&self) -> [u8; 32] {
        Sha256::digest(self.envelope_key).into()
    }
}

impl std::fmt::Debug for GatewayConfig {
    // Secrets are redacted; the fingerprint identifies the key without
    // revealing it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("username", &self.username)
            .field("session_ttl", &self.session_ttl)
            .field("max_envelope_bytes", &self.max_envelope_bytes)
            .field("data_dir", &self.data_dir)
            .field(
                "envelope_key_fingerprint",
                &hex::encode(self.envelope_key_fingerprint()),
            )
            .finish_non_exhaustive()
    }
}

fn decode_hex_array<const N: usize>(
    raw: &str,
    name: &'static str,
) -> Result<[u8; N], ConfigError> {
    let bytes = hex::decode(raw.trim()).map_err(|_| ConfigError::BadHex(name))?;
    bytes
        .try_into()
        .map_err(|_| ConfigError::BadLength(name, N))
}
