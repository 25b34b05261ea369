//! # Verification Verdicts
//!
//! Every verifier entry point returns [`VerificationVerdict<T>`]. `Ok(T)` is
//! the `Valid` verdict and carries what was established; `Err(Rejection)`
//! names exactly one reason the credential was refused.
//!
//! ## Security Invariant
//!
//! Rejections are terminal values, never panics. Nothing is coerced to
//! `Valid`: partially decodable input is a `MalformedEnvelope`.

use std::fmt;

use selfid_core::EncodingError;
use selfid_crypto::{CryptoError, KeyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The result of a verification call.
pub type VerificationVerdict<T> = Result<T, Rejection>;

/// Why a credential was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The credential does not conform to the wire format.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A key or algorithm outside the supported `OKP`/`Ed25519`/`EdDSA` set.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The proof signature does not verify under the proof header's key.
    #[error("proof signature does not verify under the embedded key")]
    InvalidProofSignature,

    /// The document self-signature does not verify under the proof key.
    #[error("document signature does not verify under the proof key")]
    InvalidDocumentSignature,

    /// The document `id` is not the identifier of the key that signed the proof.
    #[error("document id {found:?} does not match proof key identifier {expected:?}")]
    ThumbprintMismatch {
        /// `did:self:` identifier derived from the proof key.
        expected: String,
        /// The document's `id` as received.
        found: String,
    },

    /// The proof's `s256` binding does not match the document digest.
    #[error("document digest {computed} does not match proof binding {claimed}")]
    DocumentHashMismatch {
        /// Digest computed over the received document.
        computed: String,
        /// The `s256` value in the proof payload.
        claimed: String,
    },

    /// `now` lies outside the `[iat, exp]` window.
    #[error("proof valid from {iat} to {exp}, checked at {now}")]
    ClaimsExpired {
        /// Issued-at, Unix seconds.
        iat: i64,
        /// Expiry, Unix seconds.
        exp: i64,
        /// Reference time, Unix seconds.
        now: i64,
    },

    /// A time-bound claim is absent or not an integer.
    #[error("missing or non-integer claim `{0}`")]
    ClaimsMissing(String),

    /// The data signature does not verify under the document's attestation key.
    #[error("data signature does not verify under the attestation key")]
    InvalidDataSignature,
}

/// Audit classification of a [`Rejection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionClass {
    /// The input does not conform to the wire format.
    Input,
    /// A security-relevant binding failed.
    Cryptographic,
    /// The proof is outside its validity window or lacks one.
    Temporal,
}

impl Rejection {
    /// The audit class of this rejection.
    pub fn class(&self) -> RejectionClass {
        match self {
            Self::MalformedEnvelope(_) | Self::UnsupportedKeyType(_) => RejectionClass::Input,
            Self::InvalidProofSignature
            | Self::InvalidDocumentSignature
            | Self::ThumbprintMismatch { .. }
            | Self::DocumentHashMismatch { .. }
            | Self::InvalidDataSignature => RejectionClass::Cryptographic,
            Self::ClaimsExpired { .. } | Self::ClaimsMissing(_) => RejectionClass::Temporal,
        }
    }

    /// Stable verdict name for reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MalformedEnvelope(_) => "MalformedEnvelope",
            Self::UnsupportedKeyType(_) => "UnsupportedKeyType",
            Self::InvalidProofSignature => "InvalidProofSignature",
            Self::InvalidDocumentSignature => "InvalidDocumentSignature",
            Self::ThumbprintMismatch { .. } => "ThumbprintMismatch",
            Self::DocumentHashMismatch { .. } => "DocumentHashMismatch",
            Self::ClaimsExpired { .. } => "ClaimsExpired",
            Self::ClaimsMissing(_) => "ClaimsMissing",
            Self::InvalidDataSignature => "InvalidDataSignature",
        }
    }

    pub(crate) fn malformed(detail: impl fmt::Display) -> Self {
        Self::MalformedEnvelope(detail.to_string())
    }
}

impl fmt::Display for RejectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Cryptographic => "cryptographic",
            Self::Temporal => "temporal",
        })
    }
}

impl From<EncodingError> for Rejection {
    fn from(e: EncodingError) -> Self {
        Self::malformed(e)
    }
}

impl From<CryptoError> for Rejection {
    fn from(e: CryptoError) -> Self {
        Self::malformed(e)
    }
}

impl From<KeyError> for Rejection {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::Unsupported { kty, crv } => {
                Self::UnsupportedKeyType(format!("kty={kty} crv={crv}"))
            }
            other => Self::malformed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(
            Rejection::MalformedEnvelope("x".into()).class(),
            RejectionClass::Input
        );
        assert_eq!(
            Rejection::UnsupportedKeyType("kty=EC".into()).class(),
            RejectionClass::Input
        );
        assert_eq!(Rejection::InvalidProofSignature.class(), RejectionClass::Cryptographic);
        assert_eq!(Rejection::InvalidDataSignature.class(), RejectionClass::Cryptographic);
        assert_eq!(
            Rejection::ThumbprintMismatch {
                expected: "a".into(),
                found: "b".into()
            }
            .class(),
            RejectionClass::Cryptographic
        );
        assert_eq!(
            Rejection::ClaimsMissing("iat".into()).class(),
            RejectionClass::Temporal
        );
        assert_eq!(
            Rejection::ClaimsExpired {
                iat: 1,
                exp: 2,
                now: 3
            }
            .class(),
            RejectionClass::Temporal
        );
    }

    #[test]
    fn class_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RejectionClass::Cryptographic).unwrap(),
            "\"cryptographic\""
        );
        assert_eq!(RejectionClass::Temporal.to_string(), "temporal");
    }

    #[test]
    fn names_are_variant_names() {
        assert_eq!(Rejection::InvalidDocumentSignature.name(), "InvalidDocumentSignature");
        assert_eq!(
            Rejection::DocumentHashMismatch {
                computed: "a".into(),
                claimed: "b".into()
            }
            .name(),
            "DocumentHashMismatch"
        );
    }

    #[test]
    fn key_errors_split_by_kind() {
        let unsupported: Rejection = KeyError::Unsupported {
            kty: "EC".into(),
            crv: "P-256".into(),
        }
        .into();
        assert_eq!(unsupported, Rejection::UnsupportedKeyType("kty=EC crv=P-256".into()));
        let malformed: Rejection = KeyError::Malformed("no x".into()).into();
        assert!(matches!(malformed, Rejection::MalformedEnvelope(_)));
    }

    #[test]
    fn display_carries_detail() {
        let r = Rejection::ClaimsExpired {
            iat: 1000,
            exp: 2000,
            now: 2500,
        };
        assert_eq!(r.to_string(), "proof valid from 1000 to 2000, checked at 2500");
    }
}
