//! # selfid-cli: Self-Issued Credential Tooling
//!
//! Command-line front end over the verification engine and the gateway.
//!
//! ## Subcommands
//!
//! - `verify`: verify one credential and print the verdict as JSON.
//! - `thumbprint`: compute the thumbprint and `did:self:` of a JWK.
//! - `mint`: produce a reference credential from device key seeds.
//! - `scan`: poll the devices named in a gateway configuration.
//!
//! ## Exit Codes
//!
//! Handlers return `Result<u8>`: `0` valid, `2` rejected (or no valid
//! device), `1` for operational errors such as unreadable input.

pub mod mint;
pub mod scan;
pub mod thumbprint;
pub mod verify;

use selfid_core::Timestamp;

/// Exit code for a valid credential or a successful command.
pub const EXIT_VALID: u8 = 0;

/// Exit code for an operational error.
pub const EXIT_ERROR: u8 = 1;

/// Exit code for a rejected credential.
pub const EXIT_REJECTED: u8 = 2;

/// The reference time for a command: `--now` if given, else the clock.
pub fn reference_time(now: Option<i64>) -> Timestamp {
    now.map(Timestamp::from_epoch_secs)
        .unwrap_or_else(Timestamp::now)
}
