//! # Polling Gateway
//!
//! Fans out one task per registered device, fetches each credential under
//! its own timeout, verifies it, and aggregates the outcomes under the
//! configured [`AggregationPolicy`].
//!
//! ## Partial failure
//!
//! Devices fail independently. A device that times out, is unreachable, or
//! presents a rejected credential produces an outcome for itself and has no
//! effect on any other device's task.
//!
//! ## Audit logging
//!
//! Every outcome is logged with structured `device`, `address`, `verdict`
//! and `class` fields. Cryptographic and input rejections log at `warn`,
//! temporal rejections and valid credentials at `info`, unavailable devices
//! at `debug`.

use std::sync::Arc;
use std::time::Duration;

use selfid_core::{DeviceId, Timestamp};
use selfid_credential::{
    verify_credential, verify_identity, Rejection, RejectionClass, VerificationVerdict,
    VerifiedIdentity,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinSet;

use crate::config::{GatewayConfig, DEFAULT_FETCH_TIMEOUT_MS};
use crate::error::FetchError;
use crate::policy::AggregationPolicy;
use crate::registry::{DeviceEntry, DeviceRegistry};
use crate::source::CredentialSource;

/// The result of polling one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// The credential verified.
    Valid {
        /// The device's self-issued identifier.
        did: String,
        /// Proof issue time, Unix seconds.
        issued_at: i64,
        /// Proof expiry time, Unix seconds.
        expires_at: i64,
        /// Attested data, when data verification is enabled.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// The credential was refused.
    Rejected {
        /// Verdict name, e.g. `ThumbprintMismatch`.
        verdict: String,
        /// Audit class of the verdict.
        class: RejectionClass,
        /// Human-readable detail.
        detail: String,
    },
    /// No credential could be obtained.
    Unavailable {
        /// Why the fetch failed.
        reason: String,
    },
}

impl Outcome {
    fn valid(identity: &VerifiedIdentity, data: Option<Value>) -> Self {
        Self::Valid {
            did: identity.did.to_string(),
            issued_at: identity.issued_at.epoch_secs(),
            expires_at: identity.expires_at.epoch_secs(),
            data,
        }
    }

    fn rejected(rejection: &Rejection) -> Self {
        Self::Rejected {
            verdict: rejection.name().to_owned(),
            class: rejection.class(),
            detail: rejection.to_string(),
        }
    }

    fn unavailable(error: &FetchError) -> Self {
        Self::Unavailable {
            reason: error.to_string(),
        }
    }

    /// Whether this outcome is a valid credential.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// One device's outcome in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceOutcome {
    /// Gateway-local device identifier.
    pub device: DeviceId,
    /// Device address.
    pub address: String,
    /// Device label, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// The aggregate result of one poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayReport {
    /// The policy the poll ran under.
    pub policy: AggregationPolicy,
    /// The reference time credentials were checked against.
    pub polled_at: Timestamp,
    /// Outcomes in registry order. Under `first-valid`, devices whose polls
    /// were cancelled are absent.
    pub outcomes: Vec<DeviceOutcome>,
}

impl GatewayReport {
    /// Outcomes that are valid credentials.
    pub fn valid(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_valid())
    }
}

/// Polls registered devices and verifies their credentials.
#[derive(Clone)]
pub struct Gateway {
    registry: DeviceRegistry,
    source: Arc<dyn CredentialSource>,
    policy: AggregationPolicy,
    fetch_timeout: Duration,
    verify_data: bool,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("devices", &self.registry.len())
            .field("policy", &self.policy)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("verify_data", &self.verify_data)
            .finish()
    }
}

impl Gateway {
    /// Create a gateway with default settings (collect-all-valid, 5 s fetch
    /// timeout, data verification on).
    pub fn new(registry: DeviceRegistry, source: Arc<dyn CredentialSource>) -> Self {
        Self {
            registry,
            source,
            policy: AggregationPolicy::default(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            verify_data: true,
        }
    }

    /// Create a gateway from configuration, registering its devices in a
    /// fresh registry.
    pub fn from_config(config: &GatewayConfig, source: Arc<dyn CredentialSource>) -> Self {
        let registry = DeviceRegistry::new();
        for device in &config.devices {
            registry.add(device.address.clone(), device.label.clone());
        }
        Self::new(registry, source)
            .with_policy(config.policy)
            .with_fetch_timeout(config.fetch_timeout())
            .with_data_verification(config.verify_data)
    }

    /// Set the aggregation policy.
    pub fn with_policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the per-device fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Require and verify data tokens (`true`) or verify identity only.
    pub fn with_data_verification(mut self, verify_data: bool) -> Self {
        self.verify_data = verify_data;
        self
    }

    /// The registry this gateway polls.
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// The configured aggregation policy.
    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Poll every registered device, checking credentials at the current time.
    pub async fn poll(&self) -> GatewayReport {
        self.poll_at(Timestamp::now()).await
    }

    /// Poll every registered device, checking credentials at `now`.
    pub async fn poll_at(&self, now: Timestamp) -> GatewayReport {
        let snapshot = self.registry.snapshot();
        tracing::debug!(
            devices = snapshot.len(),
            policy = %self.policy,
            now = now.epoch_secs(),
            "polling devices"
        );

        let mut tasks = JoinSet::new();
        for (index, entry) in snapshot.iter().enumerate() {
            let entry = entry.clone();
            let source = Arc::clone(&self.source);
            let timeout = self.fetch_timeout;
            let verify_data = self.verify_data;
            tasks.spawn(async move {
                let outcome = poll_device(source.as_ref(), &entry, now, timeout, verify_data).await;
                (
                    index,
                    DeviceOutcome {
                        device: entry.id,
                        address: entry.address,
                        label: entry.label,
                        outcome,
                    },
                )
            });
        }

        let mut outcomes = Vec::with_capacity(snapshot.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!(error = %e, "device poll task failed");
                    continue;
                }
            };
            log_outcome(&outcome);
            let stop = outcome.outcome.is_valid() && self.policy == AggregationPolicy::FirstValid;
            outcomes.push((index, outcome));
            if stop {
                tasks.abort_all();
                break;
            }
        }
        outcomes.sort_by_key(|(index, _)| *index);

        GatewayReport {
            policy: self.policy,
            polled_at: now,
            outcomes: outcomes.into_iter().map(|(_, o)| o).collect(),
        }
    }
}

async fn poll_device(
    source: &dyn CredentialSource,
    entry: &DeviceEntry,
    now: Timestamp,
    timeout: Duration,
    verify_data: bool,
) -> Outcome {
    let raw = match tokio::time::timeout(timeout, source.fetch(entry)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => return Outcome::unavailable(&e),
        Err(_) => return Outcome::unavailable(&FetchError::TimedOut(timeout)),
    };
    let verdict: VerificationVerdict<Outcome> = if verify_data {
        verify_credential(&raw, now).map(|c| Outcome::valid(&c.identity, Some(c.data.payload)))
    } else {
        verify_identity(&raw, now).map(|identity| Outcome::valid(&identity, None))
    };
    verdict.unwrap_or_else(|rejection| Outcome::rejected(&rejection))
}

fn log_outcome(o: &DeviceOutcome) {
    let device = o.device.to_string();
    match &o.outcome {
        Outcome::Valid { did, .. } => {
            tracing::info!(%device, address = %o.address, %did, verdict = "Valid", "credential accepted");
        }
        Outcome::Rejected {
            verdict,
            class,
            detail,
        } => match class {
            RejectionClass::Temporal => tracing::info!(
                %device, address = %o.address, %verdict, %class, %detail,
                "credential outside validity window"
            ),
            RejectionClass::Input | RejectionClass::Cryptographic => tracing::warn!(
                %device, address = %o.address, %verdict, %class, %detail,
                "credential rejected"
            ),
        },
        Outcome::Unavailable { reason } => {
            tracing::debug!(%device, address = %o.address, %reason, "device unavailable");
        }
    }
}
