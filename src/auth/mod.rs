// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! # Authentication Module
//!
//! Single-tenant session authentication.
//!
//! ## Auth Flow
//!
//! 1. Client posts the configured username/password to `/auth/login`
//! 2. The [`CredentialIssuer`] checks both halves in constant time and mints
//!    a time-boxed HS256 session token
//! 3. Subsequent requests carry `Authorization: Bearer <token>`; the
//!    [`SessionValidator`] checks signature, then expiry, and recovers the
//!    [`Principal`]
//!
//! Sessions are stateless: there is no revocation list, and logout is
//! advisory (the client discards its token).

pub mod error;
pub mod extractor;
pub mod token;

pub use error::AuthError;
pub use extractor::Auth;
pub use token::{CredentialIssuer, IssuedSession, Principal, SessionValidator};
