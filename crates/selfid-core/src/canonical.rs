//! # Canonical Serialization
//!
//! This module defines `CanonicalBytes`, the construction path for bytes the
//! workspace serializes itself before hashing or signing.
//!
//! ## Two Canonical Forms
//!
//! The credential format needs two different, exactly reproducible byte
//! strings:
//!
//! 1. **Sorted-key form** ([`CanonicalBytes::new`]), RFC 8785 (JCS). Object
//!    keys sorted lexicographically, compact separators, no floats. Used for
//!    JWK thumbprints, where the key order is fixed by convention rather than
//!    by whatever the device happened to emit.
//!
//! 2. **Order-preserving compact form** ([`CanonicalBytes::compact`]):
//!    members kept in insertion order, compact separators. This is the
//!    serialization the reference device signer emits identity documents and
//!    tokens in. A received document is never re-serialized: its digest is
//!    taken over the decoded wire bytes with `sha256_received`.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. A value serialized by the workspace can
//! only reach `sha256_digest` through one of the two constructors above.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by one of the canonicalization pipelines.
///
/// # Invariants
///
/// - Constructed only through [`CanonicalBytes::new`] or
///   [`CanonicalBytes::compact`].
/// - No inserted whitespace.
/// - Valid UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct sorted-key canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// non-integer number. Returns `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Construct order-preserving compact bytes from a decoded JSON value.
    ///
    /// Object members are emitted in their original order (the workspace
    /// enables `serde_json/preserve_order`), separated by `,` and `:` with no
    /// whitespace. Numbers are emitted as `serde_json` renders them.
    pub fn compact(value: &Value) -> Result<Self, CanonicalizationError> {
        Ok(Self(serde_json::to_vec(value)?))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk a JSON tree and reject any number that is not an integer.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,24}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn sorted_form_is_deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        #[test]
        fn compact_form_reparses_to_same_value(value in json_value_no_floats()) {
            let cb = CanonicalBytes::compact(&value).unwrap();
            let reparsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(reparsed, value);
        }

        #[test]
        fn sorted_form_never_contains_whitespace_outside_strings(
            keys in prop::collection::btree_set("[a-z]{1,8}", 1..6)
        ) {
            let map: serde_json::Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            prop_assert!(!cb.as_bytes().contains(&b' '));
        }
    }
}
