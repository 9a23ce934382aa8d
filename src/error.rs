// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Central API error type and the HTTP status mapping the gateway preserves:
//! 404 not found, 409 naming conflict, 413 payload too large, 400 envelope
//! failure, 500 backend fault. Session failures (401) carry their own type,
//! [`crate::auth::AuthError`], with the same JSON body shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            message: message.into(),
        }
    }

    pub fn encryption_required() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "encryption_required",
            "This route requires an encrypted envelope body",
        )
    }

    /// Single generic kind for every envelope failure (tag mismatch, bad
    /// nonce, wrong length, wrong key). Never branch the message by cause.
    pub fn decryption_failed() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "decryption_failed",
            "Envelope could not be decrypted",
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    pub fn too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "too_large", message)
    }

    pub fn backend_fault(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "backend_fault",
            message,
        )
    }

    pub fn bad_request(error_code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_code, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.error_code)
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::not_found("Object not found"),
            StoreError::AlreadyExists => Self::conflict("Object already exists"),
            StoreError::InvalidIdentifier => {
                Self::bad_request("invalid_identifier", "Object identifier is not valid")
            }
            StoreError::Inconsistent(msg) => Self::backend_fault(msg),
            StoreError::Io(e) => {
                tracing::error!(error = %e, "object store I/O failure");
                Self::backend_fault("Object store operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.error_code.to_string(),
        });
        (self.status, body).into_response()
    }
}
