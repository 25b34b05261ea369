//! # Identity Verifier
//!
//! Decides whether a credential proves a self-issued identity. The checks
//! run in a fixed order and stop at the first failure:
//!
//! 1. Decode the envelope.
//! 2. Verify the proof signature over `header.payload` with the header key.
//! 3. Validate `iat`/`exp` against `now`.
//! 4. Require the document `id` to equal `did:self:<thumbprint(header key)>`.
//! 5. Require the proof's `s256` to equal the SHA-256 of the document bytes
//!    exactly as decoded from the wire.
//! 6. If the document segment carries a self-signature, verify it with the
//!    header key.
//!
//! Step 4 makes the identity self-certifying: only the holder of the key a
//! `did:self:` names can produce a proof for it. Step 5 pins the proof to
//! one exact document.

use selfid_core::{SelfDid, Timestamp};
use selfid_crypto::{document_digest, KeyDescriptor};

use crate::claims::validate_claims;
use crate::envelope::{decode_envelope, CredentialEnvelope, IdentityDocument};
use crate::verdict::{Rejection, VerificationVerdict};

/// What a `Valid` identity verdict establishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// The identifier the proof key owns.
    pub did: SelfDid,
    /// The key that signed the proof.
    pub proof_key: KeyDescriptor,
    /// The validated identity document.
    pub document: IdentityDocument,
    /// Proof issue time.
    pub issued_at: Timestamp,
    /// Proof expiry time.
    pub expires_at: Timestamp,
    /// Whether the document segment carried a verified self-signature.
    pub document_signed: bool,
}

/// Verify the identity proof of a raw credential at time `now`.
pub fn verify_identity(raw: &str, now: Timestamp) -> VerificationVerdict<VerifiedIdentity> {
    let envelope = decode_envelope(raw)?;
    verify_identity_envelope(&envelope, now)
}

/// Verify the identity proof of an already decoded envelope.
pub fn verify_identity_envelope(
    envelope: &CredentialEnvelope<'_>,
    now: Timestamp,
) -> VerificationVerdict<VerifiedIdentity> {
    let proof = &envelope.proof;
    let key = &proof.header.key;

    if !key.verify(&proof.signing_input(), &proof.signature) {
        return Err(Rejection::InvalidProofSignature);
    }

    let window = validate_claims(&proof.payload, now)?;

    let did = key.did();
    if envelope.document.id() != did.as_str() {
        return Err(Rejection::ThumbprintMismatch {
            expected: did.to_string(),
            found: envelope.document.id().to_owned(),
        });
    }

    let computed = document_digest(envelope.document.as_bytes());
    if computed != proof.payload.s256 {
        return Err(Rejection::DocumentHashMismatch {
            computed,
            claimed: proof.payload.s256.clone(),
        });
    }

    if let Some(signature) = &envelope.document_signature {
        if !key.verify(&envelope.document_signing_input(), signature) {
            return Err(Rejection::InvalidDocumentSignature);
        }
    }

    Ok(VerifiedIdentity {
        did,
        proof_key: key.clone(),
        document: envelope.document.clone(),
        issued_at: window.issued_at,
        expires_at: window.expires_at,
        document_signed: envelope.document_signature.is_some(),
    })
}
