//! # selfid-crypto: Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for self-issued identities:
//!
//! - **Ed25519** signing and strict verification over wire segment text.
//! - **JWK key descriptors** restricted to `OKP`/`Ed25519`.
//! - **Thumbprints** (RFC 7638) that name a key as `did:self:<thumbprint>`.
//! - **SHA-256 document digests** over order-preserving canonical JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `selfid-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   SHA-256 and real Ed25519, anchored on the RFC 8037 vectors.
//! - No global key material; every key is passed in.

pub mod ed25519;
pub mod error;
pub mod jwk;
pub mod sha256;

pub use ed25519::{verify, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SigningInput};
pub use error::{CryptoError, KeyError};
pub use jwk::{thumbprint, KeyDescriptor, CRV_ED25519, KTY_OKP};
pub use sha256::{compact_document_digest, document_digest, sorted_digest};
