//! # Scan Subcommand
//!
//! Loads a gateway configuration, registers its devices, polls them through
//! a [`FileSource`] built from each device's `credential_file`, and prints
//! the aggregated report as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use selfid_core::Timestamp;
use selfid_gateway::{AggregationPolicy, FileSource, Gateway, GatewayConfig, GatewayReport};

use crate::{reference_time, EXIT_REJECTED, EXIT_VALID};

/// Arguments for the `selfid scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Gateway configuration file (YAML).
    #[arg(long)]
    pub config: PathBuf,

    /// Override the configured aggregation policy.
    #[arg(long)]
    pub policy: Option<AggregationPolicy>,

    /// Reference time in Unix seconds (defaults to the system clock).
    #[arg(long, allow_hyphen_values = true)]
    pub now: Option<i64>,
}

/// Execute the scan subcommand.
///
/// Exits `0` when at least one device presented a valid credential and `2`
/// when none did.
pub fn run_scan(args: &ScanArgs) -> Result<u8> {
    let mut config = GatewayConfig::from_path(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(policy) = args.policy {
        config.policy = policy;
    }
    let now = reference_time(args.now);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let report = runtime.block_on(scan(&config, now));

    println!("{}", serde_json::to_string_pretty(&report)?);
    let valid = report.valid().count();
    tracing::info!(devices = report.outcomes.len(), valid, "scan complete");
    Ok(if valid > 0 { EXIT_VALID } else { EXIT_REJECTED })
}

/// Poll every device in `config` at `now`.
pub async fn scan(config: &GatewayConfig, now: Timestamp) -> GatewayReport {
    let source = Arc::new(FileSource::from_config(config));
    Gateway::from_config(config, source).poll_at(now).await
}
