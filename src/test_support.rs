// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Shared fixtures for the crate's unit tests.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tempfile::TempDir;

use crate::config::{GatewayConfig, DEFAULT_MAX_ENVELOPE_BYTES, DEFAULT_SESSION_TTL};
use crate::state::AppState;
use crate::storage::{FsBackend, StoragePaths};

/// Credentials used by the fixture: `admin` / `swordfish`, envelope key of
/// 32 `0x42` bytes.
pub(crate) fn test_config(data_dir: &std::path::Path) -> GatewayConfig {
    GatewayConfig {
        username: "admin".to_string(),
        password_sha256: Sha256::digest(b"swordfish").into(),
        token_secret: b"test-token-secret".to_vec(),
        session_ttl: DEFAULT_SESSION_TTL,
        envelope_key: [0x42; 32],
        max_envelope_bytes: DEFAULT_MAX_ENVELOPE_BYTES,
        data_dir: data_dir.to_path_buf(),
    }
}

/// Fresh application state over a tempdir-backed store. The TempDir must be
/// kept alive for the duration of the test.
pub(crate) fn test_state() -> (TempDir, AppState) {
    let dir = TempDir::new().expect("tempdir");
    let config = test_config(dir.path());
    let backend = FsBackend::new(StoragePaths::new(dir.path()));
    backend.initialize().expect("initialize backend");
    let state = AppState::new(config, Arc::new(backend));
    (dir, state)
}
