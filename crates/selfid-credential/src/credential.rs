//! # Chained Verification
//!
//! Runs the identity verifier and then the data attestation verifier over a
//! single decode of the credential. This is the order the data verifier
//! requires: the attestation key is only trusted once the document that
//! declares it has been verified.

use selfid_core::Timestamp;

use crate::data::{verify_data_envelope, AttestedData};
use crate::envelope::decode_envelope;
use crate::identity::{verify_identity_envelope, VerifiedIdentity};
use crate::verdict::VerificationVerdict;

/// A verified identity together with the data it attested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    /// The established identity.
    pub identity: VerifiedIdentity,
    /// The attested data.
    pub data: AttestedData,
}

/// Verify identity and data of a raw credential at time `now`.
///
/// Identity rejections take precedence; a credential with a valid identity
/// but no data token is a `MalformedEnvelope`.
pub fn verify_credential(raw: &str, now: Timestamp) -> VerificationVerdict<VerifiedCredential> {
    let envelope = decode_envelope(raw)?;
    let identity = verify_identity_envelope(&envelope, now)?;
    let data = verify_data_envelope(&envelope)?;
    Ok(VerifiedCredential { identity, data })
}
