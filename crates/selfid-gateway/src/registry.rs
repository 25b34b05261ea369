//! # Device Registry
//!
//! Append-only list of devices the gateway polls. Request handlers add
//! devices concurrently while polls iterate over the list.
//!
//! ## Concurrency
//!
//! The current list is an immutable `Arc<[DeviceEntry]>` behind a
//! `parking_lot::RwLock`. Appends take the write lock, copy the list with the
//! new entry, and publish the copy. A snapshot is therefore always a complete
//! list as of some append, and a poll in progress never sees entries added
//! after it started.
//!
//! Snapshot reads are not strictly lock-free. [`DeviceRegistry::snapshot`]
//! takes the read lock for one `Arc` clone (a reference-count increment) and
//! releases it before returning. It can wait only behind an append that
//! holds the write lock, and that append's critical section is the list copy.
//! Iteration over a snapshot holds no lock at all.

use std::sync::Arc;

use parking_lot::RwLock;
use selfid_core::{DeviceId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A registered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Gateway-local identifier.
    pub id: DeviceId,
    /// Network address, e.g. `fe80::1%tap0`.
    pub address: String,
    /// Optional human-readable label.
    pub label: Option<String>,
    /// When the device was added.
    pub registered_at: Timestamp,
}

/// Registration payload sent by a device announcing itself.
///
/// ```json
/// {"ipv6": "fe80::8ef:85ff:fe1b:3fc", "interface": "tap0"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    /// Link-local or global IPv6 address.
    pub ipv6: String,
    /// Network interface the address is scoped to.
    pub interface: String,
}

impl DeviceRegistration {
    /// Parse a JSON registration payload.
    pub fn from_json(payload: &str) -> Result<Self, GatewayError> {
        let reg: Self = serde_json::from_str(payload)
            .map_err(|e| GatewayError::Registration(e.to_string()))?;
        if reg.ipv6.is_empty() || reg.interface.is_empty() {
            return Err(GatewayError::Registration(
                "ipv6 and interface must be non-empty".into(),
            ));
        }
        Ok(reg)
    }

    /// The scoped address the gateway polls: `ipv6%interface`.
    pub fn address(&self) -> String {
        format!("{}%{}", self.ipv6, self.interface)
    }
}

/// Shared, append-only device registry. Cloning shares the same registry.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    entries: Arc<RwLock<Arc<[DeviceEntry]>>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Arc::from(Vec::new()))),
        }
    }

    /// Append a device and return its identifier.
    pub fn add(&self, address: impl Into<String>, label: Option<String>) -> DeviceId {
        let entry = DeviceEntry {
            id: DeviceId::new(),
            address: address.into(),
            label,
            registered_at: Timestamp::now(),
        };
        let id = entry.id;
        let mut guard = self.entries.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend_from_slice(&guard);
        next.push(entry);
        *guard = next.into();
        id
    }

    /// Append a device from a registration payload.
    pub fn register(&self, registration: &DeviceRegistration) -> DeviceId {
        self.add(registration.address(), None)
    }

    /// The current list, in insertion order.
    ///
    /// Holds the read lock only for the `Arc` clone.
    pub fn snapshot(&self) -> Arc<[DeviceEntry]> {
        Arc::clone(&self.entries.read())
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
