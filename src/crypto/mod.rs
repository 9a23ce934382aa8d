// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! Cryptographic envelope protocol for end-to-end protected routes.

pub mod envelope;

pub use envelope::{Envelope, EnvelopeCodec, EnvelopeError, NONCE_SIZE, TAG_SIZE};
