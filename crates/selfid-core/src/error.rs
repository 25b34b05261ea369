//! # Error Types
//!
//! Structured errors for the foundational layer. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! These errors describe *why* a byte string could not be turned into a
//! typed value. The credential crate folds all of them into a single
//! `MalformedEnvelope` verdict, so the detail here exists for diagnostics
//! and audit logs, never for control flow.

use thiserror::Error;

/// Top-level error type for the foundational layer.
#[derive(Error, Debug)]
pub enum SelfIdError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Text decoding failed.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// An identifier did not match its expected shape.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A timestamp was outside the representable range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in sorted-key canonical form.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error decoding a wire segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The segment length cannot be produced by any base64 encoder.
    #[error("base64url segment has impossible length {0}")]
    InvalidLength(usize),

    /// The segment contains characters outside the URL-safe alphabet,
    /// misplaced padding, or non-zero trailing bits.
    #[error("invalid base64url: {0}")]
    InvalidBase64(String),

    /// Decoded bytes were not valid UTF-8.
    #[error("decoded segment is not valid UTF-8")]
    InvalidUtf8,

    /// Decoded text was not valid JSON.
    #[error("decoded segment is not valid JSON: {0}")]
    InvalidJson(String),
}
