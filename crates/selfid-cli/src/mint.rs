//! # Mint Subcommand
//!
//! Produces a reference credential envelope the way device firmware does.
//! With fixed seeds the output is deterministic, which makes it suitable
//! for fixtures. Without seeds, fresh keys are generated.

use anyhow::{Context, Result};
use clap::Args;
use selfid_credential::DeviceSigner;
use selfid_crypto::Ed25519KeyPair;
use serde_json::Value;

use crate::{reference_time, EXIT_VALID};

/// Default credential lifetime in seconds.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Arguments for the `selfid mint` subcommand.
#[derive(Args, Debug)]
pub struct MintArgs {
    /// Proof key seed, 32 bytes base64url.
    #[arg(long)]
    pub proof_seed: Option<String>,

    /// Attestation key seed, 32 bytes base64url.
    #[arg(long)]
    pub attestation_seed: Option<String>,

    /// Issue time in Unix seconds (defaults to the system clock).
    #[arg(long, allow_hyphen_values = true)]
    pub iat: Option<i64>,

    /// Lifetime in seconds; `exp = iat + ttl`.
    #[arg(long, default_value_t = DEFAULT_TTL_SECS)]
    pub ttl: i64,

    /// Data token payload as JSON.
    #[arg(long)]
    pub data: Option<String>,

    /// Also sign the document segment with the proof key.
    #[arg(long)]
    pub sign_document: bool,
}

/// Execute the mint subcommand.
pub fn run_mint(args: &MintArgs) -> Result<u8> {
    println!("{}", mint(args)?);
    Ok(EXIT_VALID)
}

/// Build the credential described by `args`.
pub fn mint(args: &MintArgs) -> Result<String> {
    let proof_key = key_pair(args.proof_seed.as_deref()).context("invalid --proof-seed")?;
    let attestation_key =
        key_pair(args.attestation_seed.as_deref()).context("invalid --attestation-seed")?;
    let signer = DeviceSigner::new(proof_key, attestation_key)?
        .with_document_signature(args.sign_document);

    let data: Option<Value> = args
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--data is not valid JSON")?;

    let iat = reference_time(args.iat);
    let exp = iat.saturating_add_secs(args.ttl);
    tracing::info!(did = %signer.did(), iat = iat.epoch_secs(), exp = exp.epoch_secs(), "minting credential");
    Ok(signer.issue(iat, exp, data.as_ref())?)
}

fn key_pair(seed: Option<&str>) -> Result<Ed25519KeyPair> {
    match seed {
        Some(seed) => Ok(Ed25519KeyPair::from_seed_base64url(seed)?),
        None => Ok(Ed25519KeyPair::generate()),
    }
}
