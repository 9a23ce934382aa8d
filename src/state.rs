// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

use std::sync::Arc;

use crate::auth::{CredentialIssuer, SessionValidator};
use crate::config::GatewayConfig;
use crate::crypto::EnvelopeCodec;
use crate::policy::PolicyTable;
use crate::storage::{ObjectPartition, StoreBackend};

/// Shared application state: the immutable configuration and the components
/// built from it once at startup. Everything here is read-only per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub issuer: Arc<CredentialIssuer>,
    pub validator: Arc<SessionValidator>,
    pub envelope: Arc<EnvelopeCodec>,
    pub policy: Arc<PolicyTable>,
    pub objects: ObjectPartition,
}

impl AppState {
    pub fn new(config: GatewayConfig, backend: Arc<dyn StoreBackend>) -> Self {
        let issuer = CredentialIssuer::new(&config);
        let validator = SessionValidator::new(&config);
        let envelope = EnvelopeCodec::new(config.envelope_key, config.max_envelope_bytes);
        Self {
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
            envelope: Arc::new(envelope),
            policy: Arc::new(PolicyTable::gateway()),
            objects: ObjectPartition::new(backend),
            config: Arc::new(config),
        }
    }
}
