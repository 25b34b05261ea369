//! # Credential Envelope Codec
//!
//! Splits and decodes the wire form
//!
//! ```text
//! <doc>[.<doc-sig>] <header>.<payload>.<sig> [<data>.<data-sig>]
//! ```
//!
//! into typed tokens. The codec is purely structural: it checks arity,
//! base64url, UTF-8, JSON shape, and the supported key type, and nothing
//! else. Any failure is a [`Rejection::MalformedEnvelope`] or
//! [`Rejection::UnsupportedKeyType`]; there is no partial result.
//!
//! The envelope borrows segment text from the raw credential so that
//! signatures are always checked against the bytes that were transmitted.

use selfid_core::{decode_base64url, decode_base64url_json, EncodingError};
use selfid_crypto::{Ed25519Signature, KeyDescriptor, SigningInput};
use serde_json::{Map, Value};

use crate::proof::{decode_proof, ProofToken};
use crate::verdict::Rejection;

/// The attestation key declared by an identity document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attestation {
    /// Key reference within the document, e.g. `#key1`.
    pub id: Option<String>,
    /// Key format tag, e.g. `JsonWebKey2020`.
    pub key_type: Option<String>,
    /// The key that signs data tokens.
    pub key: KeyDescriptor,
}

/// A decoded identity document.
///
/// The decoded bytes are kept alongside the parsed value. The document
/// digest is computed over those bytes, never over a re-serialization, so
/// number formatting, string escapes and whitespace are all bound by `s256`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDocument {
    id: String,
    attestation: Attestation,
    value: Value,
    bytes: Vec<u8>,
}

impl IdentityDocument {
    /// Decode from the UTF-8 JSON bytes of a document segment.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Rejection> {
        let text = std::str::from_utf8(&bytes).map_err(|_| EncodingError::InvalidUtf8)?;
        let value: Value = serde_json::from_str(text)
            .map_err(|e| EncodingError::InvalidJson(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| Rejection::malformed("identity document is not a JSON object"))?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Rejection::malformed("identity document has no string `id`"))?
            .to_owned();
        let attestation = decode_attestation(obj)?;
        Ok(Self {
            id,
            attestation,
            value,
            bytes,
        })
    }

    /// The `id` member as received.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The declared attestation key.
    pub fn attestation(&self) -> &Attestation {
        &self.attestation
    }

    /// The whole document, member order preserved.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// The document bytes exactly as decoded from the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn decode_attestation(doc: &Map<String, Value>) -> Result<Attestation, Rejection> {
    let obj = doc
        .get("attestation")
        .and_then(Value::as_object)
        .ok_or_else(|| Rejection::malformed("identity document has no `attestation` object"))?;
    let jwk = obj
        .get("publicKeyJwk")
        .ok_or_else(|| Rejection::malformed("attestation has no `publicKeyJwk`"))?;
    let key = KeyDescriptor::from_jwk(jwk)?;
    Ok(Attestation {
        id: obj.get("id").and_then(Value::as_str).map(str::to_owned),
        key_type: obj.get("type").and_then(Value::as_str).map(str::to_owned),
        key,
    })
}

/// A decoded data token: application JSON signed by the attestation key.
#[derive(Debug, Clone)]
pub struct DataToken<'a> {
    /// Payload segment exactly as received.
    pub payload_segment: &'a str,
    /// Decoded application data.
    pub payload: Value,
    /// Decoded signature.
    pub signature: Ed25519Signature,
}

impl DataToken<'_> {
    /// The bytes the data signature covers: the payload segment alone.
    pub fn signing_input(&self) -> SigningInput {
        SigningInput::segment(self.payload_segment)
    }
}

/// A fully decoded credential.
#[derive(Debug, Clone)]
pub struct CredentialEnvelope<'a> {
    /// Document segment exactly as received (without its signature part).
    pub document_segment: &'a str,
    /// Decoded identity document.
    pub document: IdentityDocument,
    /// Document self-signature, when the device sends `<doc>.<doc-sig>`.
    pub document_signature: Option<Ed25519Signature>,
    /// Decoded proof token.
    pub proof: ProofToken<'a>,
    /// Decoded data token, when present.
    pub data: Option<DataToken<'a>>,
}

impl CredentialEnvelope<'_> {
    /// The bytes the document self-signature covers.
    pub fn document_signing_input(&self) -> SigningInput {
        SigningInput::segment(self.document_segment)
    }
}

/// Decode a raw credential string.
///
/// # Errors
///
/// - `MalformedEnvelope` for wrong segment counts, empty segments, invalid
///   base64url, UTF-8 or JSON, missing or mistyped required members, and
///   signatures or keys of the wrong length.
/// - `UnsupportedKeyType` for any key that is not `OKP`/`Ed25519`, or a
///   proof `alg` other than `EdDSA`.
pub fn decode_envelope(raw: &str) -> Result<CredentialEnvelope<'_>, Rejection> {
    let segments: Vec<&str> = raw.split(' ').collect();
    if !(2..=3).contains(&segments.len()) {
        return Err(Rejection::malformed(format!(
            "envelope has {} segments, expected 2 or 3",
            segments.len()
        )));
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Rejection::malformed("envelope has an empty segment"));
    }

    let (document_segment, document_signature) = split_document(segments[0])?;
    let document = IdentityDocument::from_bytes(decode_base64url(document_segment)?)?;
    let proof = decode_proof(segments[1])?;
    let data = segments.get(2).copied().map(decode_data).transpose()?;

    Ok(CredentialEnvelope {
        document_segment,
        document,
        document_signature,
        proof,
        data,
    })
}

fn split_document(segment: &str) -> Result<(&str, Option<Ed25519Signature>), Rejection> {
    let parts: Vec<&str> = segment.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(Rejection::malformed("document segment has an empty part"));
    }
    match parts[..] {
        [doc] => Ok((doc, None)),
        [doc, sig] => Ok((doc, Some(Ed25519Signature::from_base64url(sig)?))),
        _ => Err(Rejection::malformed(format!(
            "document segment has {} parts, expected 1 or 2",
            parts.len()
        ))),
    }
}

fn decode_data(segment: &str) -> Result<DataToken<'_>, Rejection> {
    let parts: Vec<&str> = segment.split('.').collect();
    let [payload_segment, signature_segment] = parts[..] else {
        return Err(Rejection::malformed(format!(
            "data token has {} parts, expected 2",
            parts.len()
        )));
    };
    if payload_segment.is_empty() || signature_segment.is_empty() {
        return Err(Rejection::malformed("data token has an empty part"));
    }
    Ok(DataToken {
        payload_segment,
        payload: decode_base64url_json(payload_segment)?,
        signature: Ed25519Signature::from_base64url(signature_segment)?,
    })
}
