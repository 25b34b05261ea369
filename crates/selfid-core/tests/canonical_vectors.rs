//! # Canonical Form Vectors
//!
//! Fixed inputs with known outputs for both canonical forms. If any of these
//! change, devices and the gateway will disagree about thumbprints or
//! document digests for byte-identical credentials.

use selfid_core::{decode_base64url_json, encode_base64url, sha256_digest, CanonicalBytes};

fn sorted_text(value: &serde_json::Value) -> String {
    let cb = CanonicalBytes::new(value).expect("canonicalization should succeed");
    String::from_utf8(cb.as_bytes().to_vec()).unwrap()
}

fn compact_text(raw: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    let cb = CanonicalBytes::compact(&value).unwrap();
    String::from_utf8(cb.as_bytes().to_vec()).unwrap()
}

#[test]
fn rfc8037_thumbprint_input() {
    // RFC 8037 Appendix A.3: the thumbprint hashes {"crv","kty","x"} in sorted order.
    let jwk = serde_json::json!({
        "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo",
        "kty": "OKP",
        "crv": "Ed25519",
    });
    assert_eq!(
        sorted_text(&jwk),
        r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#
    );
    let cb = CanonicalBytes::new(&jwk).unwrap();
    assert_eq!(
        sha256_digest(&cb).to_base64url(),
        "kPrK_qmxVWaYVA9wwBF6Iuo3vVzz7TxHCTwXBygrS4k"
    );
}

#[test]
fn sorted_form_empty_containers() {
    assert_eq!(sorted_text(&serde_json::json!({})), "{}");
    assert_eq!(sorted_text(&serde_json::json!([])), "[]");
    assert_eq!(sorted_text(&serde_json::json!({"a": {}, "b": []})), r#"{"a":{},"b":[]}"#);
}

#[test]
fn sorted_form_integers() {
    assert_eq!(
        sorted_text(&serde_json::json!({"neg": -1, "zero": 0, "big": 9_007_199_254_740_991_i64})),
        r#"{"big":9007199254740991,"neg":-1,"zero":0}"#
    );
}

#[test]
fn compact_form_keeps_device_order() {
    let raw = r##"{
        "id": "did:self:abc",
        "attestation": {
            "id": "#key1",
            "type": "JsonWebKey2020",
            "publicKeyJwk": {"kty": "OKP", "crv": "Ed25519", "x": "xyz"}
        }
    }"##;
    assert_eq!(
        compact_text(raw),
        r##"{"id":"did:self:abc","attestation":{"id":"#key1","type":"JsonWebKey2020","publicKeyJwk":{"kty":"OKP","crv":"Ed25519","x":"xyz"}}}"##
    );
}

#[test]
fn compact_and_sorted_forms_differ_for_unsorted_input() {
    let raw = r#"{"b":1,"a":2}"#;
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(compact_text(raw), r#"{"b":1,"a":2}"#);
    assert_eq!(sorted_text(&value), r#"{"a":2,"b":1}"#);
}

#[test]
fn compact_digest_of_empty_object() {
    let value = serde_json::json!({});
    let cb = CanonicalBytes::compact(&value).unwrap();
    assert_eq!(
        sha256_digest(&cb).to_base64url(),
        "RBNvo1WzZ4oRRq0W9-hknpT7T8If536DEMBg9hyq_4o"
    );
}

#[test]
fn wire_segment_decodes_in_member_order() {
    let segment = encode_base64url(r#"{"temperature":25,"scale":"C"}"#);
    let value = decode_base64url_json(&segment).unwrap();
    let cb = CanonicalBytes::compact(&value).unwrap();
    assert_eq!(cb.as_bytes(), br#"{"temperature":25,"scale":"C"}"#);
}
