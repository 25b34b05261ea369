//! # Thumbprint Subcommand
//!
//! Computes the thumbprint of an Ed25519 JWK and the `did:self:`
//! identifier it owns.

use anyhow::{Context, Result};
use clap::Args;
use selfid_crypto::KeyDescriptor;
use serde_json::{json, Value};

use crate::EXIT_VALID;

/// Arguments for the `selfid thumbprint` subcommand.
#[derive(Args, Debug)]
pub struct ThumbprintArgs {
    /// The key as JSON, e.g. `{"kty":"OKP","crv":"Ed25519","x":"..."}`.
    #[arg(long)]
    pub jwk: String,
}

/// Execute the thumbprint subcommand.
pub fn run_thumbprint(args: &ThumbprintArgs) -> Result<u8> {
    let report = thumbprint_report(&args.jwk)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(EXIT_VALID)
}

/// Parse `jwk` and render its thumbprint and identifier.
pub fn thumbprint_report(jwk: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(jwk).context("--jwk is not valid JSON")?;
    let key = KeyDescriptor::from_jwk(&value).context("unsupported or malformed key")?;
    Ok(json!({
        "thumbprint": key.thumbprint(),
        "did": key.did().as_str(),
    }))
}
