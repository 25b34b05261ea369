//! Property tests over the verification engine.

use proptest::prelude::*;
use selfid_core::{encode_base64url, Timestamp};
use selfid_credential::{verify_identity, DeviceSigner, Rejection};
use selfid_crypto::{compact_document_digest, Ed25519KeyPair, Ed25519Signature};
use serde_json::json;

fn signer() -> DeviceSigner {
    DeviceSigner::new(
        Ed25519KeyPair::from_seed(&[31u8; 32]),
        Ed25519KeyPair::from_seed(&[32u8; 32]),
    )
    .unwrap()
}

const BASE64URL: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Replace one character of the proof signature text.
fn with_signature_char(raw: &str, index: usize, replacement: char) -> String {
    let mut parts: Vec<String> = raw.split(' ').map(str::to_owned).collect();
    let proof: Vec<&str> = parts[1].split('.').collect();
    let mut sig: Vec<char> = proof[2].chars().collect();
    sig[index] = replacement;
    let sig: String = sig.into_iter().collect();
    parts[1] = format!("{}.{}.{}", proof[0], proof[1], sig);
    parts.join(" ")
}

fn reference_credential() -> String {
    signer()
        .issue(
            Timestamp::from_epoch_secs(1000),
            Timestamp::from_epoch_secs(2000),
            None,
        )
        .unwrap()
}

proptest! {
    #[test]
    fn verdict_is_deterministic(now in -10_000i64..10_000) {
        let raw = reference_credential();
        let a = verify_identity(&raw, Timestamp::from_epoch_secs(now));
        let b = verify_identity(&raw, Timestamp::from_epoch_secs(now));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn verdict_on_arbitrary_text_is_deterministic(raw in "[A-Za-z0-9_. =-]{0,200}") {
        let now = Timestamp::from_epoch_secs(1500);
        prop_assert_eq!(verify_identity(&raw, now), verify_identity(&raw, now));
    }

    #[test]
    fn validity_window_is_inclusive(now in 0i64..3000) {
        let raw = reference_credential();
        let verdict = verify_identity(&raw, Timestamp::from_epoch_secs(now));
        if (1000..=2000).contains(&now) {
            prop_assert!(verdict.is_ok());
        } else {
            let is_expired = matches!(verdict, Err(Rejection::ClaimsExpired { .. }));
            prop_assert!(is_expired);
        }
    }

    #[test]
    fn any_proof_signature_byte_flip_is_rejected(index in 0usize..64, mask in 1u8..=255) {
        let raw = reference_credential();
        let mut parts: Vec<String> = raw.split(' ').map(str::to_owned).collect();
        let proof: Vec<String> = parts[1].split('.').map(str::to_owned).collect();
        let mut sig = Ed25519Signature::from_base64url(&proof[2]).unwrap();
        sig.0[index] ^= mask;
        parts[1] = format!("{}.{}.{}", proof[0], proof[1], sig.to_base64url());

        prop_assert_eq!(
            verify_identity(&parts.join(" "), Timestamp::from_epoch_secs(1500)),
            Err(Rejection::InvalidProofSignature)
        );
    }

    // On the wire, the 64-byte signature is 86 characters. The last one
    // carries two data bits and four zero bits. Changing any other character
    // changes the signature bytes and fails verification. Changing the last
    // one does the same when the zero bits stay zero, and otherwise the
    // segment is not canonical base64url and the envelope is malformed.
    #[test]
    fn any_proof_signature_text_flip_is_rejected(index in 0usize..86, symbol in 0usize..64) {
        let raw = reference_credential();
        let original = raw.split(' ').nth(1).unwrap().split('.').nth(2).unwrap().as_bytes()[index];
        let replacement = BASE64URL[symbol];
        prop_assume!(replacement != original);

        let verdict = verify_identity(
            &with_signature_char(&raw, index, char::from(replacement)),
            Timestamp::from_epoch_secs(1500),
        );
        if index < 85 || symbol & 0x0f == 0 {
            prop_assert_eq!(verdict, Err(Rejection::InvalidProofSignature));
        } else {
            let is_malformed = matches!(verdict, Err(Rejection::MalformedEnvelope(_)));
            prop_assert!(is_malformed);
        }
    }

    #[test]
    fn non_alphabet_signature_char_is_malformed(index in 0usize..86, bad in prop::sample::select(vec!['!', '+', '/', '=', '*'])) {
        let raw = with_signature_char(&reference_credential(), index, bad);
        let is_malformed = matches!(
            verify_identity(&raw, Timestamp::from_epoch_secs(1500)),
            Err(Rejection::MalformedEnvelope(_))
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn any_document_change_after_signing_is_hash_mismatch(
        key_type in "[A-Za-z0-9]{1,24}",
        extra in prop::option::of("[a-z]{1,12}"),
    ) {
        let s = signer();
        let doc = s.document();
        let payload = json!({
            "iat": 1000,
            "exp": 2000,
            "s256": compact_document_digest(&doc).unwrap(),
        });
        let mut modified = doc.clone();
        modified["attestation"]["type"] = json!(key_type);
        if let Some(extra) = extra {
            modified["note"] = json!(extra);
        }
        prop_assume!(modified != doc);

        let raw = s.issue_raw(&modified, &payload, None).unwrap();
        let is_mismatch = matches!(
            verify_identity(&raw, Timestamp::from_epoch_secs(1500)),
            Err(Rejection::DocumentHashMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    #[test]
    fn random_document_segment_never_validates(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let raw = reference_credential();
        let mut parts: Vec<String> = raw.split(' ').map(str::to_owned).collect();
        parts[0] = encode_base64url(&bytes);
        prop_assert!(verify_identity(&parts.join(" "), Timestamp::from_epoch_secs(1500)).is_err());
    }
}
