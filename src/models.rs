// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Request and response bodies of the HTTP surface.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{Partition, PartitionFilter};

/// Login request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the bearer token and its lifetime.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Logout acknowledgement. Token invalidation is client-side.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// The authenticated identity, echoed back by `/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmI {
    pub username: String,
    /// Unix timestamp at which the session expires.
    pub expires_at: i64,
}

/// Query parameters for upload. The partition is always explicit; the
/// identifier is optional and defaults to a generated UUID.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    pub identifier: Option<String>,
    pub partition: Partition,
}

/// Query parameter selecting the partition of an object operation.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PartitionQuery {
    pub partition: Partition,
}

/// Query parameter filtering the listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    #[serde(default)]
    pub partition: PartitionFilter,
}

/// Enveloped rename request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenameRequest {
    pub new_identifier: String,
    pub partition: Partition,
}

/// Enveloped share request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShareRequest {
    pub from_partition: Partition,
}

/// Delete acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}
