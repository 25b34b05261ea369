//! # Error Types
//!
//! Gateway errors split along the one line that matters operationally:
//! [`GatewayError`] means the gateway itself is misconfigured, while
//! [`FetchError`] means one device could not produce a credential. A fetch
//! error never reaches the verification engine; it becomes an
//! `Unavailable` outcome for that device alone.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Gateway configuration or registration failure.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Reading a configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for the expected schema.
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration file is not valid YAML for the expected schema.
    #[error("invalid configuration in {path}: {source}")]
    YamlParse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_yaml::Error,
    },

    /// The configuration parsed but violates a constraint.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A device registration payload was rejected.
    #[error("invalid device registration: {0}")]
    Registration(String),
}

/// Failure obtaining a credential from one device.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source has no route to this device.
    #[error("no credential source configured for {0}")]
    NotConfigured(String),

    /// Reading the device's credential failed.
    #[error("failed to read credential for {address}: {source}")]
    Io {
        /// The device address.
        address: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The device did not answer.
    #[error("device {0} unreachable")]
    Unreachable(String),

    /// The fetch did not complete within the configured timeout.
    #[error("fetch timed out after {0:?}")]
    TimedOut(Duration),
}
