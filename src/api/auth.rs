// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

use axum::{extract::State, Json};

use crate::{
    auth::{Auth, AuthError},
    models::{LoginRequest, LoginResponse, LogoutResponse, WhoAmI},
    state::AppState,
};

/// Authenticate with the configured credentials and receive a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Authentication",
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let session = state
        .issuer
        .authenticate(&request.username, &request.password)?;

    Ok(Json(LoginResponse {
        access_token: session.token,
        token_type: "bearer".to_string(),
        expires_in: session.expires_in,
    }))
}

/// Advisory logout. Sessions are stateless: the token remains technically
/// valid until its natural expiry, and the client is expected to discard it.
/// A known limitation of the stateless design, not a bug.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses((status = 200, body = LogoutResponse))
)]
pub async fn logout(Auth(_principal): Auth) -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Successfully logged out".to_string(),
    })
}

/// Echo the authenticated principal.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses((status = 200, body = WhoAmI))
)]
pub async fn me(Auth(principal): Auth) -> Json<WhoAmI> {
    Json(WhoAmI {
        username: principal.username,
        expires_at: principal.expires_at,
    })
}
