//! # Verify Subcommand
//!
//! Verifies one credential envelope and prints the verdict as JSON.
//!
//! The credential is read from the positional argument, from `--file`, or
//! from stdin, in that order of preference. Trailing whitespace is trimmed
//! so captured files ending in a newline verify unchanged.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use selfid_core::Timestamp;
use selfid_credential::{verify_credential, verify_identity, Rejection, VerifiedIdentity};
use serde_json::{json, Value};

use crate::{reference_time, EXIT_REJECTED, EXIT_VALID};

/// Arguments for the `selfid verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// The credential envelope. Read from `--file` or stdin when omitted.
    pub credential: Option<String>,

    /// Read the credential from a file.
    #[arg(long, conflicts_with = "credential")]
    pub file: Option<PathBuf>,

    /// Reference time in Unix seconds (defaults to the system clock).
    #[arg(long, allow_hyphen_values = true)]
    pub now: Option<i64>,

    /// Verify the identity proof only; do not require a data token.
    #[arg(long)]
    pub identity_only: bool,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let raw = read_credential(args)?;
    let now = reference_time(args.now);
    tracing::debug!(now = now.epoch_secs(), identity_only = args.identity_only, "verifying credential");

    let (report, valid) = verdict_report(&raw, now, args.identity_only);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if valid { EXIT_VALID } else { EXIT_REJECTED })
}

/// Verify `raw` at `now` and render the verdict as JSON.
///
/// Returns the report and whether the verdict is valid.
pub fn verdict_report(raw: &str, now: Timestamp, identity_only: bool) -> (Value, bool) {
    let verdict = if identity_only {
        verify_identity(raw, now).map(|identity| valid_report(&identity, None))
    } else {
        verify_credential(raw, now)
            .map(|credential| valid_report(&credential.identity, Some(credential.data.payload)))
    };
    match verdict {
        Ok(report) => (report, true),
        Err(rejection) => (rejected_report(&rejection), false),
    }
}

fn valid_report(identity: &VerifiedIdentity, data: Option<Value>) -> Value {
    let mut report = json!({
        "verdict": "Valid",
        "did": identity.did.as_str(),
        "issued_at": identity.issued_at.epoch_secs(),
        "expires_at": identity.expires_at.epoch_secs(),
        "document_signed": identity.document_signed,
    });
    if let Some(data) = data {
        report["data"] = data;
    }
    report
}

fn rejected_report(rejection: &Rejection) -> Value {
    json!({
        "verdict": rejection.name(),
        "class": rejection.class(),
        "detail": rejection.to_string(),
    })
}

fn read_credential(args: &VerifyArgs) -> Result<String> {
    let text = match (&args.credential, &args.file) {
        (Some(credential), _) => credential.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credential from {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read credential from stdin")?;
            buf
        }
    };
    Ok(text.trim_end().to_owned())
}
