// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! The policy gate.
//!
//! Runs before every handler: resolves the route's requirements from the
//! policy table, validates the session, then decodes the envelope. The
//! ordering is an invariant — authentication before decryption before
//! business logic — so a request that fails either gate never reaches a
//! handler, and therefore never touches the store. On the way out, successful
//! responses of envelope-required routes are sealed with the same codec.
//!
//! The transport body is read incrementally under the configured ceiling;
//! what gets buffered is at most the bounded ciphertext, which GCM needs in
//! full before the tag verifies and any plaintext may be released.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::extractor::bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn policy_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let requirements = state
        .policy
        .resolve(request.method(), request.uri().path());

    let (mut parts, body) = request.into_parts();

    if requirements.session {
        let principal = match bearer_token(&parts)
            .and_then(|token| state.validator.validate(token))
        {
            Ok(principal) => principal,
            Err(err) => return err.into_response(),
        };
        parts.extensions.insert(principal);
    }

    let request = if requirements.envelope {
        // Base64 expands the bounded ciphertext by 4/3; allow that plus some
        // slack for the JSON framing.
        let wire_ceiling = state.config.max_envelope_bytes / 3 * 4 + 4096;
        let bytes = match to_bytes(body, wire_ceiling).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return ApiError::too_large("Payload exceeds the envelope size ceiling")
                    .into_response()
            }
        };
        if bytes.is_empty() {
            return ApiError::encryption_required().into_response();
        }
        let plaintext = match state.envelope.decode_body(&bytes) {
            Ok(plaintext) => plaintext,
            Err(err) => return ApiError::from(err).into_response(),
        };
        // The handler sees the plaintext; the transport's length header no
        // longer applies, and the content type must describe the decoded
        // payload or the Json extractor rejects it with 415.
        parts.headers.remove(CONTENT_LENGTH);
        parts
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Request::from_parts(parts, Body::from(plaintext))
    } else {
        Request::from_parts(parts, body)
    };

    let response = next.run(request).await;

    if requirements.envelope && response.status().is_success() {
        seal_response(&state, response).await
    } else {
        response
    }
}

/// Replace a successful response body with its sealed envelope.
async fn seal_response(state: &AppState, response: Response) -> Response {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to buffer response for sealing");
            return ApiError::backend_fault("Failed to seal response").into_response();
        }
    };

    match state.envelope.encode_body(&bytes) {
        Ok(sealed) => {
            parts.headers.remove(CONTENT_LENGTH);
            parts
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Response::from_parts(parts, Body::from(sealed))
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
