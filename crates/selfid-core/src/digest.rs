//! # Content Digest
//!
//! Defines `ContentDigest`, the 256-bit SHA-256 fingerprint used for both
//! key thumbprints and identity document bindings.
//!
//! ## Security Invariant
//!
//! A `ContentDigest` is computed either from `CanonicalBytes`
//! ([`sha256_digest()`]), for values the gateway serializes itself, or from
//! bytes exactly as they arrived on the wire ([`sha256_received()`]), for
//! content the device bound by its own serialization. There is no path that
//! re-encodes received content before hashing it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::encoding::encode_base64url;

/// A SHA-256 digest over canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap raw digest bytes.
    ///
    /// Prefer [`sha256_digest()`] for computing digests.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Render the digest as unpadded base64url, the form carried on the wire
    /// in `did:self:` identifiers and `s256` bindings.
    pub fn to_base64url(&self) -> String {
        encode_base64url(self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// # Security Invariant
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    digest_bytes(data.as_bytes())
}

/// Compute a SHA-256 digest over bytes exactly as received.
///
/// Used where the sender computed the digest over its own serialization,
/// so the bytes must not be parsed and re-encoded first. Any byte change,
/// including whitespace or a different escape, changes the digest.
pub fn sha256_received(data: &[u8]) -> ContentDigest {
    digest_bytes(data)
}

fn digest_bytes(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(bytes)
}
