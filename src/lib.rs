// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Vaultgate - Access-Controlled Encrypted Object Gateway
//!
//! Single-tenant gateway in front of a partitioned object store. Session
//! tokens gate the private namespace; a pre-shared-key AES-GCM envelope
//! protects a defined subset of routes end to end.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session issuance and validation
//! - `crypto` - The encrypted envelope protocol
//! - `policy` - Static route-to-requirement table
//! - `middleware` - The policy gate (auth, then decrypt, then handler)
//! - `storage` - Partitioned object store over a backend capability

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
