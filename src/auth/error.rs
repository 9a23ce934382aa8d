// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Authentication errors.
//!
//! Every variant maps to 401. Messages stay generic on purpose: a login
//! response never says whether the username or the password was wrong, and a
//! token response never explains what about the token failed beyond the
//! malformed/expired distinction the client needs for re-login.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication failure, raised by the credential issuer and the session
/// validator.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present on a session-required route
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    InvalidAuthHeader,
    /// Token failed signature or structural checks
    MalformedToken,
    /// Token signature is valid but the session has expired
    TokenExpired,
    /// Username/password pair did not match the configured credentials
    InvalidCredentials,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "expired",
            AuthError::InvalidCredentials => "unauthenticated",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Session token is invalid"),
            AuthError::TokenExpired => write!(f, "Session has expired"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (self.status_code(), body).into_response()
    }
}
