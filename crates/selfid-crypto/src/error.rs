//! # Error Types
//!
//! Errors raised while turning wire material into keys and signatures.
//! Signature *mismatch* is deliberately absent: [`crate::ed25519::verify`]
//! answers with a boolean so that a forged signature can never be confused
//! with an undecodable one.

use selfid_core::{CanonicalizationError, EncodingError};
use thiserror::Error;

/// Failure decoding or canonicalizing cryptographic material.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key bytes had the wrong length or shape.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Signature bytes had the wrong length.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// A base64url segment could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Canonicalization of a JSON value failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Failure interpreting a JWK as an Ed25519 key descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key type or curve is outside the supported set (`OKP` / `Ed25519`).
    #[error("unsupported key type kty={kty:?} crv={crv:?}")]
    Unsupported {
        /// The `kty` member as received.
        kty: String,
        /// The `crv` member as received.
        crv: String,
    },

    /// A required member was absent or not a string, or the JWK was not an object.
    #[error("malformed JWK: {0}")]
    Malformed(String),

    /// The `x` member did not decode to a 32-byte public key.
    #[error("invalid public key in JWK: {0}")]
    InvalidKeyMaterial(String),
}
