//! # Temporal Types: Unix-Second Timestamps
//!
//! Defines `Timestamp`, the clock value threaded explicitly through every
//! time-dependent check. Proof tokens carry `iat`/`exp` as integer Unix
//! seconds, so the type stores exactly that and nothing finer.
//!
//! ## Determinism
//!
//! The verification engine never reads a clock. Callers obtain a `Timestamp`
//! at the boundary (usually [`Timestamp::now()`] in the gateway, or a fixed
//! value in tests and the CLI `--now` flag) and pass it in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SelfIdError;

/// A UTC instant with whole-second precision, stored as Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// Create a timestamp from Unix epoch seconds.
    ///
    /// Any `i64` is accepted; range checks only matter when rendering.
    pub const fn from_epoch_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub const fn epoch_secs(&self) -> i64 {
        self.0
    }

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// # Errors
    ///
    /// Returns `SelfIdError::InvalidTimestamp` if the value is outside the
    /// range chrono can represent.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, SelfIdError> {
        DateTime::from_timestamp(self.0, 0)
            .ok_or_else(|| SelfIdError::InvalidTimestamp(format!("Unix seconds out of range: {}", self.0)))
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`), falling
    /// back to the raw seconds when the value is unrepresentable.
    pub fn to_iso8601(&self) -> String {
        match self.to_datetime() {
            Ok(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            Err(_) => format!("@{}", self.0),
        }
    }

    /// Add a signed number of seconds, saturating at the `i64` bounds.
    pub const fn saturating_add_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn epoch_roundtrip() {
        let ts = Timestamp::from_epoch_secs(1_700_000_000);
        assert_eq!(ts.epoch_secs(), 1_700_000_000);
    }

    #[test]
    fn from_utc_truncates_subseconds() {
        let dt = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 30, 45)
            .unwrap()
            .with_nanosecond(999_000_000)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn iso8601_of_epoch_zero() {
        assert_eq!(Timestamp::from_epoch_secs(0).to_iso8601(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn unrepresentable_renders_raw() {
        let ts = Timestamp::from_epoch_secs(i64::MAX);
        assert!(ts.to_datetime().is_err());
        assert_eq!(ts.to_iso8601(), format!("@{}", i64::MAX));
    }

    #[test]
    fn ordering_follows_seconds() {
        assert!(Timestamp::from_epoch_secs(1000) < Timestamp::from_epoch_secs(1001));
    }

    #[test]
    fn saturating_add() {
        assert_eq!(
            Timestamp::from_epoch_secs(i64::MAX).saturating_add_secs(10),
            Timestamp::from_epoch_secs(i64::MAX)
        );
        assert_eq!(
            Timestamp::from_epoch_secs(1000).saturating_add_secs(-1),
            Timestamp::from_epoch_secs(999)
        );
    }

    #[test]
    fn serde_is_plain_integer() {
        let json = serde_json::to_string(&Timestamp::from_epoch_secs(1500)).unwrap();
        assert_eq!(json, "1500");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.epoch_secs(), 1500);
    }

    #[test]
    fn now_is_after_2020() {
        assert!(Timestamp::now().epoch_secs() > 1_577_836_800);
    }
}
