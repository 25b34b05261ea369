//! # JWK Key Descriptors and Thumbprints
//!
//! A [`KeyDescriptor`] is the only form in which a public key enters the
//! verification engine. It is built from a decoded JWK object and checked
//! against the single supported key shape, `{"kty":"OKP","crv":"Ed25519"}`.
//!
//! ## Thumbprint
//!
//! The thumbprint (RFC 7638) hashes the registered members `crv`, `kty`, `x`
//! in sorted-key canonical form. `x` is hashed as the unpadded base64url
//! re-encoding of the decoded key bytes, so one key has one identifier
//! however the sender padded it. The result, unpadded base64url SHA-256, is
//! the suffix of the `did:self:` identifier.

use selfid_core::SelfDid;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ed25519::{verify, Ed25519PublicKey, Ed25519Signature, SigningInput};
use crate::error::KeyError;
use crate::sha256::sorted_digest;

/// The only supported JWK key type.
pub const KTY_OKP: &str = "OKP";

/// The only supported JWK curve.
pub const CRV_ED25519: &str = "Ed25519";

/// An Ed25519 public key as described by a JWK.
///
/// Immutable. Constructed only from a decoded JWK object or from a key the
/// caller already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    kty: String,
    crv: String,
    x: String,
    public_key: Ed25519PublicKey,
    thumbprint: String,
}

/// The registered members, in the order JCS will emit them anyway.
#[derive(Serialize)]
struct ThumbprintMembers<'a> {
    crv: &'a str,
    kty: &'a str,
    x: &'a str,
}

impl KeyDescriptor {
    /// Parse a JWK object.
    ///
    /// # Errors
    ///
    /// - `KeyError::Malformed` if `jwk` is not an object or `kty`, `crv`,
    ///   or `x` is absent or not a string.
    /// - `KeyError::Unsupported` if `kty`/`crv` is not `OKP`/`Ed25519`.
    /// - `KeyError::InvalidKeyMaterial` if `x` does not decode to 32 bytes.
    pub fn from_jwk(jwk: &Value) -> Result<Self, KeyError> {
        let obj = jwk
            .as_object()
            .ok_or_else(|| KeyError::Malformed("JWK is not a JSON object".into()))?;
        let kty = string_member(obj, "kty")?;
        let crv = string_member(obj, "crv")?;
        if kty != KTY_OKP || crv != CRV_ED25519 {
            return Err(KeyError::Unsupported {
                kty: kty.to_owned(),
                crv: crv.to_owned(),
            });
        }
        let x = string_member(obj, "x")?;
        let public_key = Ed25519PublicKey::from_base64url(x)
            .map_err(|e| KeyError::InvalidKeyMaterial(e.to_string()))?;
        Self::from_members(kty, crv, x, public_key)
    }

    /// Describe a key held locally, encoding `x` as unpadded base64url.
    pub fn from_public_key(public_key: &Ed25519PublicKey) -> Result<Self, KeyError> {
        Self::from_members(
            KTY_OKP,
            CRV_ED25519,
            &public_key.to_base64url(),
            public_key.clone(),
        )
    }

    fn from_members(
        kty: &str,
        crv: &str,
        x: &str,
        public_key: Ed25519PublicKey,
    ) -> Result<Self, KeyError> {
        let canonical_x = public_key.to_base64url();
        let thumbprint = sorted_digest(&ThumbprintMembers {
            crv,
            kty,
            x: &canonical_x,
        })
        .map_err(|e| KeyError::Malformed(e.to_string()))?;
        Ok(Self {
            kty: kty.to_owned(),
            crv: crv.to_owned(),
            x: x.to_owned(),
            public_key,
            thumbprint,
        })
    }

    /// The `kty` member.
    pub fn kty(&self) -> &str {
        &self.kty
    }

    /// The `crv` member.
    pub fn crv(&self) -> &str {
        &self.crv
    }

    /// The `x` member exactly as received.
    pub fn x(&self) -> &str {
        &self.x
    }

    /// The decoded public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// The RFC 7638 thumbprint, unpadded base64url.
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    /// The self-issued identifier this key owns.
    pub fn did(&self) -> SelfDid {
        SelfDid::from_thumbprint(&self.thumbprint)
    }

    /// Verify a signature made by this key. See [`crate::ed25519::verify`].
    pub fn verify(&self, input: &SigningInput, signature: &Ed25519Signature) -> bool {
        verify(&self.public_key, input, signature)
    }

    /// Render as a JWK object with members in `kty`, `crv`, `x` order.
    pub fn to_jwk(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("kty".into(), Value::String(self.kty.clone()));
        obj.insert("crv".into(), Value::String(self.crv.clone()));
        obj.insert("x".into(), Value::String(self.x.clone()));
        Value::Object(obj)
    }
}

/// Compute the thumbprint of a key descriptor.
pub fn thumbprint(key: &KeyDescriptor) -> String {
    key.thumbprint.clone()
}

fn string_member<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a str, KeyError> {
    obj.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| KeyError::Malformed(format!("missing or non-string member `{name}`")))
}
