//! # SHA-256 Bindings
//!
//! The two digests the credential format depends on, each pinned to the
//! canonical form it must be computed over:
//!
//! - [`document_digest()`]: the identity document bytes exactly as decoded
//!   from the wire, carried in the proof payload as `s256`.
//!   [`compact_document_digest()`] is the same digest for a document the
//!   caller serializes itself in compact form, as device firmware does.
//! - [`sorted_digest()`]: sorted-key JCS, used by the thumbprint engine.
//!
//! Both render as unpadded base64url, the form compared on the wire.

use selfid_core::{sha256_digest, sha256_received, CanonicalBytes};
use serde::Serialize;
use serde_json::Value;

use crate::error::CryptoError;

/// Digest identity document bytes exactly as received.
pub fn document_digest(document: &[u8]) -> String {
    sha256_received(document).to_base64url()
}

/// Digest a document serialized in order-preserving compact form.
pub fn compact_document_digest(document: &Value) -> Result<String, CryptoError> {
    let cb = CanonicalBytes::compact(document)?;
    Ok(sha256_digest(&cb).to_base64url())
}

/// Digest a value over its sorted-key canonical form.
pub fn sorted_digest(value: &impl Serialize) -> Result<String, CryptoError> {
    let cb = CanonicalBytes::new(value)?;
    Ok(sha256_digest(&cb).to_base64url())
}
