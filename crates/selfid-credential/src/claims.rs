//! # Claims Validator
//!
//! Checks a proof's validity window against an explicit reference time.
//! Both bounds are inclusive: a proof is valid at exactly `iat` and at
//! exactly `exp`. A proof issued in the future is rejected the same way as
//! an expired one.

use selfid_core::Timestamp;

use crate::proof::ProofPayload;
use crate::verdict::{Rejection, VerificationVerdict};

/// The validity window of an accepted proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimWindow {
    /// When the proof was issued.
    pub issued_at: Timestamp,
    /// When the proof stops being valid.
    pub expires_at: Timestamp,
}

/// Validate `iat`/`exp` against `now`.
///
/// # Errors
///
/// - `ClaimsMissing` if either claim is absent, or is not a JSON integer
///   representable as `i64`. That includes numbers with a fractional part or
///   exponent even when their value is whole (`1500.0`, `1.5e3`), integers
///   above `i64::MAX`, strings, booleans and `null`.
/// - `ClaimsExpired` if `now < iat` or `now > exp`.
pub fn validate_claims(payload: &ProofPayload, now: Timestamp) -> VerificationVerdict<ClaimWindow> {
    let iat = payload
        .iat
        .ok_or_else(|| Rejection::ClaimsMissing("iat".into()))?;
    let exp = payload
        .exp
        .ok_or_else(|| Rejection::ClaimsMissing("exp".into()))?;
    let now_secs = now.epoch_secs();
    if now_secs < iat || now_secs > exp {
        return Err(Rejection::ClaimsExpired {
            iat,
            exp,
            now: now_secs,
        });
    }
    Ok(ClaimWindow {
        issued_at: Timestamp::from_epoch_secs(iat),
        expires_at: Timestamp::from_epoch_secs(exp),
    })
}
