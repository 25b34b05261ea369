//! # Reference Device Signer
//!
//! Produces credentials the way device firmware does, for tests, fixtures,
//! and the CLI `mint` command. A device holds two Ed25519 keys:
//!
//! - the **proof key**, whose thumbprint is the device's `did:self:`
//!   identifier and which signs the proof token (and optionally the
//!   document segment);
//! - the **attestation key**, declared in the identity document, which
//!   signs data tokens.
//!
//! The signer never issues keys for anyone else and keeps no state beyond
//! its own two key pairs.

use selfid_core::{encode_base64url, CanonicalBytes, SelfDid, Timestamp};
use selfid_crypto::{
    compact_document_digest, CryptoError, Ed25519KeyPair, KeyDescriptor, KeyError, SigningInput,
};
use serde_json::{json, Value};

use crate::proof::ALG_EDDSA;

/// Attestation key reference written into minted documents.
pub const ATTESTATION_KEY_ID: &str = "#key1";

/// Attestation key format tag written into minted documents.
pub const ATTESTATION_KEY_TYPE: &str = "JsonWebKey2020";

/// Signs credentials with a device's proof and attestation keys.
#[derive(Debug)]
pub struct DeviceSigner {
    proof_key: Ed25519KeyPair,
    attestation_key: Ed25519KeyPair,
    proof_jwk: KeyDescriptor,
    attestation_jwk: KeyDescriptor,
    sign_document: bool,
}

impl DeviceSigner {
    /// Build a signer from existing key pairs.
    pub fn new(proof_key: Ed25519KeyPair, attestation_key: Ed25519KeyPair) -> Result<Self, KeyError> {
        let proof_jwk = KeyDescriptor::from_public_key(&proof_key.public_key())?;
        let attestation_jwk = KeyDescriptor::from_public_key(&attestation_key.public_key())?;
        Ok(Self {
            proof_key,
            attestation_key,
            proof_jwk,
            attestation_jwk,
            sign_document: false,
        })
    }

    /// Build a signer with two freshly generated key pairs.
    pub fn generate() -> Result<Self, KeyError> {
        Self::new(Ed25519KeyPair::generate(), Ed25519KeyPair::generate())
    }

    /// Also sign the document segment with the proof key (`<doc>.<doc-sig>`).
    pub fn with_document_signature(mut self, sign_document: bool) -> Self {
        self.sign_document = sign_document;
        self
    }

    /// The identifier this device's proof key owns.
    pub fn did(&self) -> SelfDid {
        self.proof_jwk.did()
    }

    /// The proof key descriptor.
    pub fn proof_jwk(&self) -> &KeyDescriptor {
        &self.proof_jwk
    }

    /// The attestation key descriptor.
    pub fn attestation_jwk(&self) -> &KeyDescriptor {
        &self.attestation_jwk
    }

    /// The identity document this device presents.
    pub fn document(&self) -> Value {
        json!({
            "id": self.did().as_str(),
            "attestation": {
                "id": ATTESTATION_KEY_ID,
                "type": ATTESTATION_KEY_TYPE,
                "publicKeyJwk": self.attestation_jwk.to_jwk(),
            }
        })
    }

    /// Issue a credential valid from `iat` to `exp`, optionally carrying data.
    pub fn issue(
        &self,
        iat: Timestamp,
        exp: Timestamp,
        data: Option<&Value>,
    ) -> Result<String, CryptoError> {
        let document = self.document();
        let payload = json!({
            "iat": iat.epoch_secs(),
            "exp": exp.epoch_secs(),
            "s256": compact_document_digest(&document)?,
        });
        self.issue_raw(&document, &payload, data)
    }

    /// Issue a credential from an explicit document and proof payload.
    ///
    /// Nothing is checked: the payload's `s256` is whatever the caller put
    /// there. Used to produce deliberately inconsistent credentials.
    pub fn issue_raw(
        &self,
        document: &Value,
        payload: &Value,
        data: Option<&Value>,
    ) -> Result<String, CryptoError> {
        let bytes = CanonicalBytes::compact(document)?;
        self.issue_with_document_bytes(bytes.as_bytes(), payload, data)
    }

    /// Issue a credential whose document segment encodes `document` byte for
    /// byte, for documents laid out differently from the compact form.
    pub fn issue_with_document_bytes(
        &self,
        document: &[u8],
        payload: &Value,
        data: Option<&Value>,
    ) -> Result<String, CryptoError> {
        let doc_segment = encode_base64url(document);
        let header = json!({"alg": ALG_EDDSA, "jwk": self.proof_jwk.to_jwk()});
        let header_segment = encode_json(&header)?;
        let payload_segment = encode_json(payload)?;
        let proof_sig = self
            .proof_key
            .sign(&SigningInput::joined(&header_segment, &payload_segment));

        let mut out = doc_segment.clone();
        if self.sign_document {
            let doc_sig = self.proof_key.sign(&SigningInput::segment(&doc_segment));
            out.push('.');
            out.push_str(&doc_sig.to_base64url());
        }
        out.push(' ');
        out.push_str(&format!(
            "{header_segment}.{payload_segment}.{}",
            proof_sig.to_base64url()
        ));
        if let Some(data) = data {
            out.push(' ');
            out.push_str(&self.data_token(data)?);
        }
        Ok(out)
    }

    /// Sign application data with the attestation key: `<data>.<sig>`.
    pub fn data_token(&self, data: &Value) -> Result<String, CryptoError> {
        let segment = encode_json(data)?;
        let sig = self.attestation_key.sign(&SigningInput::segment(&segment));
        Ok(format!("{segment}.{}", sig.to_base64url()))
    }
}

fn encode_json(value: &Value) -> Result<String, CryptoError> {
    Ok(encode_base64url(CanonicalBytes::compact(value)?))
}
