//! # selfid-gateway: Device Gateway
//!
//! Polls constrained devices for their self-issued credentials and verifies
//! them with `selfid-credential`.
//!
//! - [`DeviceRegistry`]: append-only, copy-on-write device list shared
//!   between registration handlers and pollers.
//! - [`CredentialSource`]: how a device's raw credential is obtained.
//! - [`Gateway`]: concurrent fan-out with a per-device timeout, aggregated
//!   under an explicit [`AggregationPolicy`].
//! - [`GatewayConfig`]: YAML configuration.
//!
//! One unresponsive or misbehaving device never delays or changes another
//! device's outcome.

pub mod config;
pub mod error;
pub mod gateway;
pub mod policy;
pub mod registry;
pub mod source;

pub use config::{DeviceConfig, GatewayConfig, DEFAULT_FETCH_TIMEOUT_MS};
pub use error::{FetchError, GatewayError};
pub use gateway::{DeviceOutcome, Gateway, GatewayReport, Outcome};
pub use policy::AggregationPolicy;
pub use registry::{DeviceEntry, DeviceRegistration, DeviceRegistry};
pub use source::{CredentialSource, FileSource, MemorySource};
