//! # selfid-credential: Self-Issued Credential Verification
//!
//! Decides whether a credential string produced by a constrained device
//! proves a `did:self:` identity, and whether the data it carries was
//! attested by that identity.
//!
//! ## Entry Points
//!
//! - [`verify_identity`]: `(raw, now)` → [`VerifiedIdentity`] or [`Rejection`].
//! - [`verify_data`]: `raw` → [`AttestedData`] or [`Rejection`].
//! - [`verify_credential`]: both, over one decode.
//!
//! ## Crate Policy
//!
//! - Pure functions of their arguments. No I/O, no clock reads, no caches,
//!   no logging. Safe to call concurrently from any number of tasks.
//! - Every failure is a classified [`Rejection`]; nothing panics on input.
//! - [`DeviceSigner`] is a reference producer for tests and tooling. It is
//!   not used on the verification path.

pub mod claims;
pub mod credential;
pub mod data;
pub mod envelope;
pub mod identity;
pub mod proof;
pub mod signer;
pub mod verdict;

pub use claims::{validate_claims, ClaimWindow};
pub use credential::{verify_credential, VerifiedCredential};
pub use data::{verify_data, verify_data_envelope, AttestedData};
pub use envelope::{decode_envelope, Attestation, CredentialEnvelope, DataToken, IdentityDocument};
pub use identity::{verify_identity, verify_identity_envelope, VerifiedIdentity};
pub use proof::{ProofHeader, ProofPayload, ProofToken};
pub use signer::DeviceSigner;
pub use verdict::{Rejection, RejectionClass, VerificationVerdict};
