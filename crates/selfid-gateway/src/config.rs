//! # Gateway Configuration
//!
//! YAML configuration for a polling gateway:
//!
//! ```yaml
//! policy: first-valid          # or collect-all-valid (default)
//! fetch_timeout_ms: 2000       # default 5000, must be > 0
//! verify_data: true            # default true
//! devices:
//!   - address: "fe80::8ef:85ff:fe1b:3fc%tap0"
//!     credential_file: captures/board-1.cred
//!     label: board-1
//! ```
//!
//! With `verify_data: true` every device must present a data token and the
//! gateway runs the chained identity and data check; with `false` only the
//! identity proof is verified.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::policy::AggregationPolicy;

/// Default per-device fetch timeout in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// One configured device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Network address, e.g. `fe80::1%tap0`.
    pub address: String,
    /// File holding the device's captured credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_file: Option<PathBuf>,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Top-level gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// How per-device outcomes are aggregated.
    #[serde(default)]
    pub policy: AggregationPolicy,
    /// Per-device fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Whether data tokens are required and verified.
    #[serde(default = "default_verify_data")]
    pub verify_data: bool,
    /// Devices to register at startup.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_verify_data() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            policy: AggregationPolicy::default(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            verify_data: true,
            devices: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, GatewayError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    ///
    /// Relative `credential_file` paths are resolved against the directory
    /// containing the configuration file.
    pub fn from_path(path: &Path) -> Result<Self, GatewayError> {
        let text = std::fs::read_to_string(path).map_err(|source| GatewayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&text).map_err(|source| GatewayError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        if let Some(base) = path.parent() {
            for device in &mut config.devices {
                if let Some(file) = &device.credential_file {
                    if file.is_relative() {
                        device.credential_file = Some(base.join(file));
                    }
                }
            }
        }
        Ok(config)
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.fetch_timeout_ms == 0 {
            return Err(GatewayError::Config("fetch_timeout_ms must be > 0".into()));
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.address.is_empty() {
                return Err(GatewayError::Config("device address must be non-empty".into()));
            }
            if !seen.insert(device.address.as_str()) {
                return Err(GatewayError::Config(format!(
                    "duplicate device address {:?}",
                    device.address
                )));
            }
        }
        Ok(())
    }

    /// The per-device fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
