// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Session token issuance and validation.
//!
//! Sessions are stateless HS256 JWTs carrying `{sub, iat, exp}`. Nothing is
//! persisted server side, and there is no revocation list: logout is advisory
//! and a token stays technically valid until its natural expiry. This is a
//! deliberate simplification of the single-tenant design, documented as a
//! known limitation rather than a bug.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::AuthError;
use crate::config::GatewayConfig;

/// The authenticated identity recovered from a valid session token.
/// Single-tenant: always the one configured user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    /// Unix timestamp at which the session expires.
    pub expires_at: i64,
}

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    /// Seconds until expiry, for the login response body.
    pub expires_in: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Verifies the configured credential pair and mints session tokens.
pub struct CredentialIssuer {
    username_sha256: [u8; 32],
    password_sha256: [u8; 32],
    username: String,
    encoding_key: EncodingKey,
    ttl_secs: i64,
}

impl CredentialIssuer {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            username_sha256: Sha256::digest(config.username.as_bytes()).into(),
            password_sha256: config.password_sha256,
            username: config.username.clone(),
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            ttl_secs: config.session_ttl.as_secs() as i64,
        }
    }

    /// Check the credential pair and issue a session on match.
    ///
    /// Both comparisons run in constant time over fixed-length digests, and
    /// both always run, so the response cannot leak which half was wrong.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let username_hash: [u8; 32] = Sha256::digest(username.as_bytes()).into();
        let password_hash: [u8; 32] = Sha256::digest(password.as_bytes()).into();

        let matches = username_hash.ct_eq(&self.username_sha256)
            & password_hash.ct_eq(&self.password_sha256);
        if !bool::from(matches) {
            return Err(AuthError::InvalidCredentials);
        }

        self.mint(Utc::now().timestamp())
    }

    /// Issue a token with `iat = now` and `exp = now + ttl`.
    pub(crate) fn mint(&self, now: i64) -> Result<IssuedSession, AuthError> {
        let claims = SessionClaims {
            sub: self.username.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::MalformedToken)?;
        Ok(IssuedSession {
            token,
            expires_in: self.ttl_secs as u64,
        })
    }
}

/// Verifies session tokens: signature first, then expiry.
///
/// Pure function of the token and the current time; no server-side state.
pub struct SessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionValidator {
    pub fn new(config: &GatewayConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The TTL boundary is exact: valid at exp, rejected strictly after.
        validation.leeway = 0;
        Self {
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::MalformedToken,
            },
        )?;

        Ok(Principal {
            username: data.claims.sub,
            expires_at: data.claims.exp,
        })
    }
}
