//! Concurrent polling across devices with mixed behaviour.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use selfid_core::Timestamp;
use selfid_credential::{DeviceSigner, RejectionClass};
use selfid_crypto::Ed25519KeyPair;
use selfid_gateway::{
    AggregationPolicy, CredentialSource, DeviceEntry, DeviceRegistry, FetchError, FileSource,
    Gateway, GatewayConfig, MemorySource, Outcome,
};
use serde_json::json;

const NOW: i64 = 1500;

fn signer(seed: u8) -> DeviceSigner {
    DeviceSigner::new(
        Ed25519KeyPair::from_seed(&[seed; 32]),
        Ed25519KeyPair::from_seed(&[seed.wrapping_add(100); 32]),
    )
    .unwrap()
}

fn credential(seed: u8, iat: i64, exp: i64) -> String {
    signer(seed)
        .issue(
            Timestamp::from_epoch_secs(iat),
            Timestamp::from_epoch_secs(exp),
            Some(&json!({"temperature": 20 + i64::from(seed)})),
        )
        .unwrap()
}

/// Serves fixed credentials, sleeping first for addresses listed as slow.
struct DelayedSource {
    credentials: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

#[async_trait]
impl CredentialSource for DelayedSource {
    async fn fetch(&self, device: &DeviceEntry) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(&device.address) {
            tokio::time::sleep(*delay).await;
        }
        self.credentials
            .get(&device.address)
            .cloned()
            .ok_or_else(|| FetchError::Unreachable(device.address.clone()))
    }
}

#[tokio::test]
async fn collect_all_reports_every_device_in_registry_order() {
    let registry = DeviceRegistry::new();
    let source = Arc::new(MemorySource::new());

    registry.add("valid-a", Some("a".into()));
    source.insert("valid-a", credential(1, 1000, 2000));

    registry.add("expired", None);
    source.insert("expired", credential(2, 1000, 1200));

    registry.add("forged", None);
    let mut forged = credential(3, 1000, 2000);
    forged.replace_range(0..1, if forged.starts_with('e') { "f" } else { "e" });
    source.insert("forged", forged);

    registry.add("silent", None);

    registry.add("valid-b", None);
    source.insert("valid-b", credential(5, 1000, 2000));

    let gateway = Gateway::new(registry, source);
    let report = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;

    assert_eq!(report.policy, AggregationPolicy::CollectAllValid);
    let addresses: Vec<&str> = report.outcomes.iter().map(|o| o.address.as_str()).collect();
    assert_eq!(addresses, ["valid-a", "expired", "forged", "silent", "valid-b"]);

    match &report.outcomes[0].outcome {
        Outcome::Valid { did, data, .. } => {
            assert_eq!(did, signer(1).did().as_str());
            assert_eq!(data.as_ref().unwrap()["temperature"], 21);
        }
        other => panic!("expected valid, got {other:?}"),
    }
    assert_eq!(report.outcomes[0].label.as_deref(), Some("a"));

    assert!(matches!(
        &report.outcomes[1].outcome,
        Outcome::Rejected { class: RejectionClass::Temporal, verdict, .. } if verdict == "ClaimsExpired"
    ));
    assert!(matches!(
        &report.outcomes[2].outcome,
        Outcome::Rejected { .. }
    ));
    assert!(matches!(
        &report.outcomes[3].outcome,
        Outcome::Unavailable { .. }
    ));
    assert!(report.outcomes[4].outcome.is_valid());
    assert_eq!(report.valid().count(), 2);
}

#[tokio::test]
async fn slow_device_times_out_without_delaying_others() {
    let registry = DeviceRegistry::new();
    registry.add("slow", None);
    registry.add("fast", None);

    let source = DelayedSource {
        credentials: HashMap::from([
            ("slow".to_owned(), credential(1, 1000, 2000)),
            ("fast".to_owned(), credential(2, 1000, 2000)),
        ]),
        delays: HashMap::from([("slow".to_owned(), Duration::from_secs(30))]),
    };

    let gateway = Gateway::new(registry, Arc::new(source))
        .with_fetch_timeout(Duration::from_millis(100));
    let started = Instant::now();
    let report = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(
        &report.outcomes[0].outcome,
        Outcome::Unavailable { reason } if reason.contains("timed out")
    ));
    assert!(report.outcomes[1].outcome.is_valid());
}

#[tokio::test]
async fn first_valid_stops_without_waiting_for_slow_devices() {
    let registry = DeviceRegistry::new();
    registry.add("slow", None);
    registry.add("fast", None);

    let source = DelayedSource {
        credentials: HashMap::from([
            ("slow".to_owned(), credential(1, 1000, 2000)),
            ("fast".to_owned(), credential(2, 1000, 2000)),
        ]),
        delays: HashMap::from([("slow".to_owned(), Duration::from_secs(30))]),
    };

    let gateway = Gateway::new(registry, Arc::new(source))
        .with_policy(AggregationPolicy::FirstValid)
        .with_fetch_timeout(Duration::from_secs(60));
    let started = Instant::now();
    let report = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.policy, AggregationPolicy::FirstValid);
    assert_eq!(report.valid().count(), 1);
    assert_eq!(report.outcomes.last().unwrap().address, "fast");
    assert!(report.outcomes.iter().all(|o| o.address != "slow"));
}

#[tokio::test]
async fn first_valid_with_no_valid_device_reports_everything() {
    let registry = DeviceRegistry::new();
    registry.add("expired", None);
    registry.add("silent", None);
    let source = Arc::new(MemorySource::new());
    source.insert("expired", credential(1, 0, 10));

    let gateway = Gateway::new(registry, source).with_policy(AggregationPolicy::FirstValid);
    let report = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.valid().count(), 0);
}

#[tokio::test]
async fn identity_only_mode_accepts_credentials_without_data() {
    let registry = DeviceRegistry::new();
    registry.add("bare", None);
    let source = Arc::new(MemorySource::new());
    let bare = signer(7)
        .issue(
            Timestamp::from_epoch_secs(1000),
            Timestamp::from_epoch_secs(2000),
            None,
        )
        .unwrap();
    source.insert("bare", bare);

    let chained = Gateway::new(registry.clone(), source.clone());
    let report = chained.poll_at(Timestamp::from_epoch_secs(NOW)).await;
    assert!(matches!(
        &report.outcomes[0].outcome,
        Outcome::Rejected { class: RejectionClass::Input, .. }
    ));

    let identity_only = Gateway::new(registry, source).with_data_verification(false);
    let report = identity_only.poll_at(Timestamp::from_epoch_secs(NOW)).await;
    assert!(matches!(
        &report.outcomes[0].outcome,
        Outcome::Valid { data: None, .. }
    ));
}

#[tokio::test]
async fn devices_added_during_a_poll_wait_for_the_next_one() {
    let registry = DeviceRegistry::new();
    registry.add("a", None);
    let source = Arc::new(MemorySource::new());
    source.insert("a", credential(1, 1000, 2000));
    source.insert("b", credential(2, 1000, 2000));

    let gateway = Gateway::new(registry.clone(), source);
    let first = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;
    registry.add("b", None);
    let second = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;

    assert_eq!(first.outcomes.len(), 1);
    assert_eq!(second.outcomes.len(), 2);
    assert_eq!(gateway.registry().len(), 2);
}

#[tokio::test]
async fn gateway_from_yaml_config_with_file_source() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.cred"), credential(1, 1000, 2000) + "\n").unwrap();
    std::fs::write(dir.path().join("two.cred"), credential(2, 1000, 1100)).unwrap();
    let config_path = dir.path().join("gateway.yaml");
    std::fs::write(
        &config_path,
        r#"
policy: collect-all-valid
fetch_timeout_ms: 1000
devices:
  - address: "fe80::1%tap0"
    credential_file: one.cred
    label: board-1
  - address: "fe80::2%tap0"
    credential_file: two.cred
  - address: "fe80::3%tap0"
"#,
    )
    .unwrap();

    let config = GatewayConfig::from_path(&config_path).unwrap();
    let gateway = Gateway::from_config(&config, Arc::new(FileSource::from_config(&config)));
    assert_eq!(gateway.registry().len(), 3);

    let report = gateway.poll_at(Timestamp::from_epoch_secs(NOW)).await;
    assert!(report.outcomes[0].outcome.is_valid());
    assert_eq!(report.outcomes[0].label.as_deref(), Some("board-1"));
    assert!(matches!(
        &report.outcomes[1].outcome,
        Outcome::Rejected { class: RejectionClass::Temporal, .. }
    ));
    assert!(matches!(
        &report.outcomes[2].outcome,
        Outcome::Unavailable { .. }
    ));
}

#[tokio::test]
async fn report_serializes_with_status_tags() {
    let registry = DeviceRegistry::new();
    registry.add("a", None);
    let source = Arc::new(MemorySource::new());
    source.insert("a", credential(1, 1000, 2000));

    let report = Gateway::new(registry, source)
        .poll_at(Timestamp::from_epoch_secs(NOW))
        .await;
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["policy"], "collect-all-valid");
    assert_eq!(value["polled_at"], NOW);
    assert_eq!(value["outcomes"][0]["status"], "valid");
    assert_eq!(value["outcomes"][0]["address"], "a");
    assert_eq!(value["outcomes"][0]["issued_at"], 1000);
}
