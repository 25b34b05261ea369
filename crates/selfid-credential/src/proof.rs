//! # Proof Tokens
//!
//! A proof token is the compact three-part structure
//! `<header>.<payload>.<signature>`, each part unpadded base64url:
//!
//! - header: `{"alg":"EdDSA","jwk":{...}}`, naming the signing key.
//! - payload: `{"iat":N,"exp":N,"s256":"..."}`, binding a document digest
//!   to a validity window.
//! - signature: 64 raw Ed25519 bytes over `header.payload` as transmitted.
//!
//! Decoding here is structural. `iat`/`exp` are extracted but not judged;
//! that is the claims validator's job.

use selfid_core::decode_base64url_json;
use selfid_crypto::{Ed25519Signature, KeyDescriptor, SigningInput};
use serde_json::Value;

use crate::verdict::Rejection;

/// The only accepted `alg` header value.
pub const ALG_EDDSA: &str = "EdDSA";

/// Decoded proof header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofHeader {
    /// `alg`, if the device sent one. Always `EdDSA` after decoding.
    pub alg: Option<String>,
    /// The key that signed the proof.
    pub key: KeyDescriptor,
}

/// Decoded proof payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofPayload {
    /// Base64url SHA-256 of the identity document.
    pub s256: String,
    /// Issued-at, if present as a JSON integer that fits in `i64`.
    pub iat: Option<i64>,
    /// Expiry, if present as a JSON integer that fits in `i64`.
    pub exp: Option<i64>,
}

/// A decoded proof token, borrowing its segment text from the envelope.
#[derive(Debug, Clone)]
pub struct ProofToken<'a> {
    /// Header segment exactly as received.
    pub header_segment: &'a str,
    /// Payload segment exactly as received.
    pub payload_segment: &'a str,
    /// Decoded header.
    pub header: ProofHeader,
    /// Decoded payload.
    pub payload: ProofPayload,
    /// Decoded signature.
    pub signature: Ed25519Signature,
}

impl ProofToken<'_> {
    /// The bytes the proof signature covers: `header.payload`.
    pub fn signing_input(&self) -> SigningInput {
        SigningInput::joined(self.header_segment, self.payload_segment)
    }
}

/// Decode a `header.payload.signature` segment.
pub fn decode_proof(segment: &str) -> Result<ProofToken<'_>, Rejection> {
    let parts: Vec<&str> = segment.split('.').collect();
    let [header_segment, payload_segment, signature_segment] = parts[..] else {
        return Err(Rejection::malformed(format!(
            "proof token has {} parts, expected 3",
            parts.len()
        )));
    };
    if parts.iter().any(|p| p.is_empty()) {
        return Err(Rejection::malformed("proof token has an empty part"));
    }

    let header = decode_header(&decode_base64url_json(header_segment)?)?;
    let payload = decode_payload(&decode_base64url_json(payload_segment)?)?;
    let signature = Ed25519Signature::from_base64url(signature_segment)?;

    Ok(ProofToken {
        header_segment,
        payload_segment,
        header,
        payload,
        signature,
    })
}

fn decode_header(value: &Value) -> Result<ProofHeader, Rejection> {
    let obj = value
        .as_object()
        .ok_or_else(|| Rejection::malformed("proof header is not a JSON object"))?;
    let alg = match obj.get("alg") {
        None => None,
        Some(Value::String(alg)) if alg == ALG_EDDSA => Some(alg.clone()),
        Some(Value::String(alg)) => {
            return Err(Rejection::UnsupportedKeyType(format!("alg={alg}")));
        }
        Some(_) => return Err(Rejection::malformed("proof header `alg` is not a string")),
    };
    let jwk = obj
        .get("jwk")
        .ok_or_else(|| Rejection::malformed("proof header has no `jwk`"))?;
    let key = KeyDescriptor::from_jwk(jwk)?;
    Ok(ProofHeader { alg, key })
}

fn decode_payload(value: &Value) -> Result<ProofPayload, Rejection> {
    let obj = value
        .as_object()
        .ok_or_else(|| Rejection::malformed("proof payload is not a JSON object"))?;
    let s256 = obj
        .get("s256")
        .and_then(Value::as_str)
        .ok_or_else(|| Rejection::malformed("proof payload has no string `s256`"))?
        .to_owned();
    Ok(ProofPayload {
        s256,
        iat: obj.get("iat").and_then(Value::as_i64),
        exp: obj.get("exp").and_then(Value::as_i64),
    })
}
