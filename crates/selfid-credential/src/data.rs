//! # Data Attestation Verifier
//!
//! Binds reported data to an identity. The data signature is checked with
//! the document's *attestation* key, not the proof key, so a data token only
//! verifies if it was signed by the key the identity document declares.
//!
//! The attestation key is only trustworthy once the document itself has
//! been verified. Callers must obtain a `Valid` identity verdict for the same
//! credential first, or use [`crate::verify_credential`], which chains both.

use selfid_crypto::KeyDescriptor;
use serde_json::Value;

use crate::envelope::{decode_envelope, CredentialEnvelope};
use crate::verdict::{Rejection, VerificationVerdict};

/// What a `Valid` data verdict establishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedData {
    /// The application data, for the caller to interpret.
    pub payload: Value,
    /// The key that attested it.
    pub attestation_key: KeyDescriptor,
}

/// Verify the data token of a raw credential.
pub fn verify_data(raw: &str) -> VerificationVerdict<AttestedData> {
    let envelope = decode_envelope(raw)?;
    verify_data_envelope(&envelope)
}

/// Verify the data token of an already decoded envelope.
///
/// # Errors
///
/// - `MalformedEnvelope` if the credential carries no data token.
/// - `InvalidDataSignature` if the signature does not verify under the
///   document's attestation key.
pub fn verify_data_envelope(envelope: &CredentialEnvelope<'_>) -> VerificationVerdict<AttestedData> {
    let data = envelope
        .data
        .as_ref()
        .ok_or_else(|| Rejection::malformed("credential carries no data token"))?;
    let key = &envelope.document.attestation().key;
    if !key.verify(&data.signing_input(), &data.signature) {
        return Err(Rejection::InvalidDataSignature);
    }
    Ok(AttestedData {
        payload: data.payload.clone(),
        attestation_key: key.clone(),
    })
}
