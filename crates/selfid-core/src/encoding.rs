//! # Base64url Codec
//!
//! Every binary and JSON segment of a credential envelope travels as
//! URL-safe base64 with the `=` padding stripped. Constrained devices are not
//! always consistent about this, so the decoder restores padding to the next
//! multiple of four itself and then decodes strictly: characters outside the
//! URL-safe alphabet, padding in the middle of a segment, and non-zero
//! trailing bits are all rejected.
//!
//! Encoding always produces the unpadded form.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

use crate::error::EncodingError;

/// Encode bytes as unpadded base64url.
pub fn encode_base64url(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url segment, restoring stripped padding first.
///
/// Already-padded input is accepted unchanged. A segment whose unpadded
/// length is `1 (mod 4)` cannot come from any encoder and is rejected
/// before decoding.
pub fn decode_base64url(segment: &str) -> Result<Vec<u8>, EncodingError> {
    let padded = restore_padding(segment)?;
    URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

/// Decode a base64url segment into UTF-8 text.
pub fn decode_base64url_utf8(segment: &str) -> Result<String, EncodingError> {
    let bytes = decode_base64url(segment)?;
    String::from_utf8(bytes).map_err(|_| EncodingError::InvalidUtf8)
}

/// Decode a base64url segment into a JSON value.
///
/// The text must be UTF-8 and a single JSON value. Object member order is
/// preserved.
pub fn decode_base64url_json(segment: &str) -> Result<Value, EncodingError> {
    let text = decode_base64url_utf8(segment)?;
    serde_json::from_str(&text).map_err(|e| EncodingError::InvalidJson(e.to_string()))
}

fn restore_padding(segment: &str) -> Result<String, EncodingError> {
    let unpadded_len = segment.trim_end_matches('=').len();
    if segment.len() % 4 == 0 {
        return Ok(segment.to_owned());
    }
    if unpadded_len != segment.len() || segment.len() % 4 == 1 {
        return Err(EncodingError::InvalidLength(segment.len()));
    }
    let missing = 4 - segment.len() % 4;
    let mut padded = String::with_capacity(segment.len() + missing);
    padded.push_str(segment);
    padded.extend(std::iter::repeat('=').take(missing));
    Ok(padded)
}
