//! # Ed25519 Signing and Verification
//!
//! Provides Ed25519 key generation, signing, and verification for proof
//! tokens, document self-signatures, and data attestations.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be a `&SigningInput`, built from the ASCII text of
//!   wire segments. Signatures cover the encoded segments exactly as
//!   transmitted, never a re-serialization of their decoded content.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize` or expose the private key bytes.
//! - [`verify()`] returns `bool`. A bad signature, a wrong key, and a
//!   public key that is not a valid curve point all answer `false`; none of
//!   them is an error.
//! - Verification is strict: non-canonical `s` scalars and small-order
//!   public keys are rejected.
//!
//! ## Serde
//!
//! - Public keys serialize/deserialize as unpadded base64url strings.
//! - Signatures serialize/deserialize as unpadded base64url strings.

use ed25519_dalek::Signer;
use selfid_core::{decode_base64url, encode_base64url};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// The exact byte string covered by a signature.
///
/// Constructed only from wire segment text, so the bytes that are verified
/// are always the bytes that were transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput(Vec<u8>);

/// An Ed25519 public key (32 bytes) for signature verification.
///
/// Serializes as an unpadded base64url string, the JWK `x` encoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes).
///
/// Serializes as an unpadded base64url string, the compact-token encoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; 64]);

/// An Ed25519 key pair for signing operations.
///
/// Does not implement `Serialize`: private keys must not be accidentally
/// serialized into logs, reports, or credentials.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// SigningInput impls
// ---------------------------------------------------------------------------

impl SigningInput {
    /// A single segment signed on its own (document and data tokens).
    pub fn segment(segment: &str) -> Self {
        Self(segment.as_bytes().to_vec())
    }

    /// Two segments joined by `.` (proof tokens: `header.payload`).
    pub fn joined(first: &str, second: &str) -> Self {
        let mut bytes = Vec::with_capacity(first.len() + 1 + second.len());
        bytes.extend_from_slice(first.as_bytes());
        bytes.push(b'.');
        bytes.extend_from_slice(second.as_bytes());
        Self(bytes)
    }

    /// Access the bytes to be signed or verified.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as unpadded base64url.
    pub fn to_base64url(&self) -> String {
        encode_base64url(self.0)
    }

    /// Parse a public key from base64url (padded or unpadded).
    ///
    /// Only the length is checked. Whether the bytes are a valid curve point
    /// is decided at verification time.
    pub fn from_base64url(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base64url(s)?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKeyMaterial(format!(
                "public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey` for verification operations.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("invalid public key: {e}")))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64url())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64url(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64url())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as unpadded base64url.
    pub fn to_base64url(&self) -> String {
        encode_base64url(self.0)
    }

    /// Parse a signature from base64url (padded or unpadded).
    pub fn from_base64url(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base64url(s)?;
        let arr: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!(
                "signature must be 64 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64url())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64url(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64url())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from raw 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create a key pair from a base64url-encoded 32-byte seed (the JWK `d`
    /// member encoding).
    pub fn from_seed_base64url(s: &str) -> Result<Self, CryptoError> {
        let bytes = decode_base64url(s)?;
        let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKeyMaterial(format!(
                "seed must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// Get the public key from this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        let vk = self.signing_key.verifying_key();
        Ed25519PublicKey(vk.to_bytes())
    }

    /// Sign wire segment text.
    pub fn sign(&self, input: &SigningInput) -> Ed25519Signature {
        let sig = self.signing_key.sign(input.as_bytes());
        Ed25519Signature(sig.to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over wire segment text.
///
/// Returns `true` only if `public_key` is a valid curve point and
/// `signature` is a strictly valid signature over `input`. Never errors.
pub fn verify(
    public_key: &Ed25519PublicKey,
    input: &SigningInput,
    signature: &Ed25519Signature,
) -> bool {
    let Ok(vk) = public_key.to_verifying_key() else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify_strict(input.as_bytes(), &sig).is_ok()
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}
