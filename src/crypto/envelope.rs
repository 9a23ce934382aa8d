// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Vaultgate Contributors

//! The encrypted envelope protocol.
//!
//! Envelope-required routes carry their payload as an AES-256-GCM envelope
//! under the pre-shared key. Authenticated encryption means tampering is
//! detected, not just ignored: a flipped bit anywhere in nonce, ciphertext or
//! tag fails the tag check.
//!
//! ## Wire format
//!
//! The body is a JSON document with base64 (standard alphabet, padded)
//! fields:
//!
//! ```json
//! {
//!   "nonce": "<12 bytes>",
//!   "ciphertext": "<payload>",
//!   "tag": "<16 bytes>",
//!   "key_fingerprint": "<optional hex SHA-256 of the key>"
//! }
//! ```
//!
//! This layout is stable; clients and server agree on it out-of-band along
//! with the key. The optional fingerprint lets the server reject a
//! mismatched key before running AES, but the rejection is the same generic
//! failure as a tag mismatch so the response never reveals which check
//! tripped.
//!
//! ## Nonce policy
//!
//! A fresh random 96-bit nonce is generated per encrypt and transmitted with
//! the ciphertext. Random nonces bound the collision probability (negligible
//! for any realistic request volume under one key) but do not eliminate it;
//! the single-tenant deployment accepts that bound instead of carrying
//! counter state.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Key, Nonce,
};
use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::ApiError;

/// AES-256-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// The nonce+ciphertext+tag bundle as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    pub nonce: String,
    pub ciphertext: String,
    pub tag: String,
    /// Hex SHA-256 of the key the sender used. Optional fast-fail check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_fingerprint: Option<String>,
}

/// Envelope failures.
///
/// Decode failures of every cause (bad base64, wrong nonce length, tag
/// mismatch, wrong key) collapse into the single `DecryptionFailed` variant
/// so error responses cannot serve as a padding or key oracle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("payload exceeds the envelope size ceiling")]
    TooLarge,
    #[error("envelope could not be decrypted")]
    DecryptionFailed,
}

impl From<EnvelopeError> for ApiError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::TooLarge => {
                ApiError::too_large("Payload exceeds the envelope size ceiling")
            }
            EnvelopeError::DecryptionFailed => ApiError::decryption_failed(),
        }
    }
}

/// Encodes and decodes envelopes under the pre-shared key.
///
/// The raw key never leaves this struct; logs and errors only ever see the
/// SHA-256 fingerprint.
pub struct EnvelopeCodec {
    cipher: Aes256Gcm,
    fingerprint_hex: String,
    max_bytes: usize,
}

impl EnvelopeCodec {
    pub fn new(key: [u8; 32], max_bytes: usize) -> Self {
        let fingerprint: [u8; 32] = Sha256::digest(key).into();
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
            fingerprint_hex: hex::encode(fingerprint),
            max_bytes,
        }
    }

    /// Hex fingerprint of the configured key.
    pub fn fingerprint_hex(&self) -> &str {
        &self.fingerprint_hex
    }

    /// Ceiling on plaintext/ciphertext size.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Encrypt a payload under a fresh random nonce.
    pub fn encode(&self, plaintext: &[u8]) -> Result<Envelope, EnvelopeError> {
        if plaintext.len() > self.max_bytes {
            return Err(EnvelopeError::TooLarge);
        }

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: &[],
                },
            )
            .map_err(|_| EnvelopeError::DecryptionFailed)?;

        // aes-gcm appends the tag to the ciphertext; the wire format carries
        // them as separate fields.
        let split = sealed.len() - TAG_SIZE;
        Ok(Envelope {
            nonce: Base64::encode_string(&nonce),
            ciphertext: Base64::encode_string(&sealed[..split]),
            tag: Base64::encode_string(&sealed[split..]),
            key_fingerprint: Some(self.fingerprint_hex.clone()),
        })
    }

    /// Decrypt an envelope, verifying the authentication tag.
    pub fn decode(&self, envelope: &Envelope) -> Result<Vec<u8>, EnvelopeError> {
        if let Some(fingerprint) = &envelope.key_fingerprint {
            // Fast-fail on a key the sender knows is wrong; same generic
            // error as any other failure.
            if !fingerprint.eq_ignore_ascii_case(&self.fingerprint_hex) {
                return Err(EnvelopeError::DecryptionFailed);
            }
        }

        let nonce = Base64::decode_vec(&envelope.nonce)
            .map_err(|_| EnvelopeError::DecryptionFailed)?;
        let ciphertext = Base64::decode_vec(&envelope.ciphertext)
            .map_err(|_| EnvelopeError::DecryptionFailed)?;
        let tag = Base64::decode_vec(&envelope.tag)
            .map_err(|_| EnvelopeError::DecryptionFailed)?;

        if nonce.len() != NONCE_SIZE || tag.len() != TAG_SIZE {
            return Err(EnvelopeError::DecryptionFailed);
        }
        if ciphertext.len() > self.max_bytes {
            return Err(EnvelopeError::TooLarge);
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        self.cipher
            .decrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &sealed,
                    aad: &[],
                },
            )
            .map_err(|_| EnvelopeError::DecryptionFailed)
    }

    /// Parse a request body as an envelope and decrypt it.
    pub fn decode_body(&self, body: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let envelope: Envelope =
            serde_json::from_slice(body).map_err(|_| EnvelopeError::DecryptionFailed)?;
        self.decode(&envelope)
    }

    /// Encrypt a response payload and serialize it as the JSON wire format.
    pub fn encode_body(&self, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let envelope = self.encode(plaintext)?;
        serde_json::to_vec(&envelope).map_err(|_| EnvelopeError::DecryptionFailed)
    }
}
