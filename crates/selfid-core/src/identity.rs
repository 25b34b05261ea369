//! # Identity Newtypes
//!
//! Newtype wrappers for the two identifier namespaces in the gateway. These
//! prevent accidental identifier confusion: a gateway-local `DeviceId` can
//! never be passed where a self-issued `SelfDid` is expected.
//!
//! ## Security Invariant
//!
//! A `SelfDid` is the only identifier that carries trust. It is derived from
//! a key thumbprint, so it names a key, not a network endpoint. `DeviceId`
//! is bookkeeping for the gateway and is never compared against credentials.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SelfIdError;

/// Method prefix of every self-issued decentralized identifier.
pub const SELF_DID_PREFIX: &str = "did:self:";

/// A self-issued decentralized identifier: `did:self:<thumbprint>`.
///
/// The thumbprint is the unpadded base64url SHA-256 of the signing key's
/// sorted canonical JWK.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SelfDid(String);

impl SelfDid {
    /// Build an identifier from a thumbprint string.
    pub fn from_thumbprint(thumbprint: &str) -> Self {
        Self(format!("{SELF_DID_PREFIX}{thumbprint}"))
    }

    /// Parse an identifier, checking the method prefix.
    ///
    /// The thumbprint part must be non-empty. Its content is not validated
    /// here; a mismatched thumbprint is detected by comparison, not parsing.
    pub fn parse(s: &str) -> Result<Self, SelfIdError> {
        match s.strip_prefix(SELF_DID_PREFIX) {
            Some(rest) if !rest.is_empty() => Ok(Self(s.to_owned())),
            Some(_) => Err(SelfIdError::InvalidIdentifier(format!(
                "empty thumbprint in {s:?}"
            ))),
            None => Err(SelfIdError::InvalidIdentifier(format!(
                "expected {SELF_DID_PREFIX} prefix, got {s:?}"
            ))),
        }
    }

    /// The thumbprint part after the method prefix.
    pub fn thumbprint(&self) -> &str {
        &self.0[SELF_DID_PREFIX.len()..]
    }

    /// Access the full identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelfDid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SelfDid {
    type Error = SelfIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SelfDid> for String {
    fn from(did: SelfDid) -> Self {
        did.0
    }
}

/// Gateway-local identifier for a registered device entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub Uuid);

impl DeviceId {
    /// Generate a new random device identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device:{}", self.0)
    }
}
