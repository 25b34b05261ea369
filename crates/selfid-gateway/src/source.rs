//! # Credential Sources
//!
//! A [`CredentialSource`] turns a registry entry into the raw credential
//! string the device presents. The transport is the source's business; the
//! gateway only sees a string or a [`FetchError`].
//!
//! - [`FileSource`] reads one file per device address, for fixtures and
//!   offline audits of captured credentials.
//! - [`MemorySource`] serves credentials from an in-memory map, for tests
//!   and for handlers that receive credentials pushed by devices.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::GatewayConfig;
use crate::error::FetchError;
use crate::registry::DeviceEntry;

/// Fetches the raw credential a device presents.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Fetch the credential of one device.
    async fn fetch(&self, device: &DeviceEntry) -> Result<String, FetchError>;
}

/// Reads each device's credential from a file.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    files: HashMap<String, PathBuf>,
}

impl FileSource {
    /// Create a source with no files mapped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a device address to a credential file.
    pub fn with_file(mut self, address: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.insert(address, path);
        self
    }

    /// Map every configured device that names a `credential_file`.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut source = Self::new();
        for device in &config.devices {
            if let Some(path) = &device.credential_file {
                source.insert(device.address.clone(), path);
            }
        }
        source
    }

    /// Map a device address to a credential file.
    pub fn insert(&mut self, address: impl Into<String>, path: impl AsRef<Path>) {
        self.files.insert(address.into(), path.as_ref().to_path_buf());
    }
}

#[async_trait]
impl CredentialSource for FileSource {
    async fn fetch(&self, device: &DeviceEntry) -> Result<String, FetchError> {
        let path = self
            .files
            .get(&device.address)
            .ok_or_else(|| FetchError::NotConfigured(device.address.clone()))?;
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                address: device.address.clone(),
                source,
            })?;
        Ok(text.trim_end().to_owned())
    }
}

/// Serves credentials from memory. Wrap in an `Arc` to share one source
/// between a gateway and the handlers that update it.
#[derive(Debug, Default)]
pub struct MemorySource {
    credentials: RwLock<HashMap<String, String>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the credential a device presents.
    pub fn insert(&self, address: impl Into<String>, credential: impl Into<String>) {
        self.credentials
            .write()
            .insert(address.into(), credential.into());
    }
}

#[async_trait]
impl CredentialSource for MemorySource {
    async fn fetch(&self, device: &DeviceEntry) -> Result<String, FetchError> {
        self.credentials
            .read()
            .get(&device.address)
            .cloned()
            .ok_or_else(|| FetchError::Unreachable(device.address.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfid_core::{DeviceId, Timestamp};
    use std::io::Write;

    fn entry(address: &str) -> DeviceEntry {
        DeviceEntry {
            id: DeviceId::new(),
            address: address.into(),
            label: None,
            registered_at: Timestamp::from_epoch_secs(0),
        }
    }

    #[tokio::test]
    async fn file_source_trims_trailing_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "doc proof data  ").unwrap();
        let source = FileSource::new().with_file("fe80::1%tap0", file.path());
        let text = source.fetch(&entry("fe80::1%tap0")).await.unwrap();
        assert_eq!(text, "doc proof data");
    }

    #[tokio::test]
    async fn file_source_unmapped_device() {
        let source = FileSource::new();
        assert!(matches!(
            source.fetch(&entry("x")).await,
            Err(FetchError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new().with_file("x", dir.path().join("absent.cred"));
        assert!(matches!(
            source.fetch(&entry("x")).await,
            Err(FetchError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn file_source_from_config_skips_devices_without_files() {
        let config = GatewayConfig::from_yaml_str(
            "devices:\n  - address: a\n    credential_file: /tmp/a.cred\n  - address: b\n",
        )
        .unwrap();
        let source = FileSource::from_config(&config);
        assert_eq!(source.files.len(), 1);
        assert!(matches!(
            source.fetch(&entry("b")).await,
            Err(FetchError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn memory_source_serves_latest() {
        let source = MemorySource::new();
        source.insert("a", "first");
        source.insert("a", "second");
        assert_eq!(source.fetch(&entry("a")).await.unwrap(), "second");
        assert!(matches!(
            source.fetch(&entry("b")).await,
            Err(FetchError::Unreachable(_))
        ));
    }
}
