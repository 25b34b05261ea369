//! # selfid-core: Foundational Types for the Credential Engine
//!
//! This crate is the leaf of the workspace dependency graph. It defines the
//! primitives every other crate builds on when deciding whether a device's
//! self-issued identity can be trusted.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Values the gateway serializes itself are
//!    hashed over `CanonicalBytes`. There are two construction paths:
//!    sorted-key JCS (used for key thumbprints) and order-preserving compact
//!    JSON (the form the reference signer emits identity documents in).
//!
//! 2. **Two digest entry points.** [`sha256_digest()`] accepts only
//!    `&CanonicalBytes`; [`sha256_received()`] hashes wire bytes untouched,
//!    which is how a received identity document is bound to its proof.
//!
//! 3. **One base64url codec.** Devices strip `=` padding on the wire; the
//!    decoder in [`encoding`] restores it before decoding and rejects anything
//!    that is not canonical base64url.
//!
//! 4. **Explicit clocks.** [`Timestamp`] is a plain value. Nothing in the
//!    engine crates reads the system clock except [`Timestamp::now()`], which
//!    callers invoke at the boundary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `selfid-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_received, ContentDigest};
pub use encoding::{
    decode_base64url, decode_base64url_json, decode_base64url_utf8, encode_base64url,
};
pub use error::{CanonicalizationError, EncodingError, SelfIdError};
pub use identity::{DeviceId, SelfDid, SELF_DID_PREFIX};
pub use temporal::Timestamp;
