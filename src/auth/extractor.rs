// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Axum extractor for the authenticated principal.
//!
//! The policy gate middleware validates the token for session-required routes
//! and stashes the [`Principal`] in request extensions; this extractor picks
//! it up, falling back to direct header validation for handlers used outside
//! the gate (unit tests mostly).

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, Principal};
use crate::state::AppState;

/// Extractor that requires an authenticated session.
///
/// ```rust,ignore
/// async fn me(Auth(principal): Auth) -> Json<WhoAmI> {
///     // principal.username is the configured single-tenant user
/// }
/// ```
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Auth(principal));
        }

        let token = bearer_token(parts)?;
        let principal = state.validator.validate(token)?;
        Ok(Auth(principal))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)
}
