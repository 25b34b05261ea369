//! # selfid CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use selfid_cli::mint::{run_mint, MintArgs};
use selfid_cli::scan::{run_scan, ScanArgs};
use selfid_cli::thumbprint::{run_thumbprint, ThumbprintArgs};
use selfid_cli::verify::{run_verify, VerifyArgs};
use selfid_cli::EXIT_ERROR;

/// Self-issued credential tooling for device gateways.
///
/// Verifies `did:self` credential envelopes, computes key thumbprints,
/// mints reference credentials, and scans configured devices.
#[derive(Parser, Debug)]
#[command(name = "selfid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a credential envelope and print the verdict.
    Verify(VerifyArgs),

    /// Compute the thumbprint and did:self identifier of an Ed25519 JWK.
    Thumbprint(ThumbprintArgs),

    /// Mint a reference credential from device key seeds.
    Mint(MintArgs),

    /// Poll the devices in a gateway configuration and print the report.
    Scan(ScanArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the verbosity flag.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Verify(args) => run_verify(&args),
        Commands::Thumbprint(args) => run_thumbprint(&args),
        Commands::Mint(args) => run_mint(&args),
        Commands::Scan(args) => run_scan(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
