//! # Full Runtime
//!
//! `RelayRuntime` over a temp work directory, with a delivery that records
//! what the notification worker sends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use relay_runtime::{HostCollaborators, RelayConfig, RelayRuntime};
use rg_01_access_control::{DeliveryError, InMemoryContentStore, NotificationDelivery};
use rg_03_admin_dispatch::AdminRequest;
use serde_json::json;
use shared_types::{IdentityKey, RequestContext};

use super::fixtures::{key, message};

#[derive(Default)]
struct RecordingDelivery {
    sent: Mutex<Vec<(IdentityKey, String)>>,
}

#[async_trait]
impl NotificationDelivery for RecordingDelivery {
    async fn deliver(&self, recipient: &IdentityKey, text: &str) -> Result<(), DeliveryError> {
        self.sent.lock().push((recipient.clone(), text.to_string()));
        Ok(())
    }
}

async fn wait_for_deliveries(delivery: &RecordingDelivery, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while delivery.sent.lock().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("notifications delivered in time");
}

#[tokio::test]
async fn test_admin_actions_notify_every_configured_admin() {
    let dir = tempfile::tempdir().unwrap();
    let admins = vec![key('a'), key('b')];
    let config = RelayConfig {
        work_dir: dir.path().to_path_buf(),
        relay_url: "relay.test".into(),
        admins: admins.iter().map(|k| k.as_str().to_string()).collect(),
        ..RelayConfig::default()
    };

    let delivery = Arc::new(RecordingDelivery::default());
    let spammer = key('c');
    let content = Arc::new(InMemoryContentStore::with_messages(vec![message('1', &spammer, 1)]));
    let runtime = RelayRuntime::new(
        config,
        HostCollaborators {
            delivery: delivery.clone(),
            content_stores: vec![content.clone()],
        },
    )
    .unwrap();
    runtime.start().await.unwrap();

    runtime
        .handle_admin(
            &admins[0],
            &AdminRequest::new("banpubkey", vec![json!(spammer.as_str()), json!("spam")]),
        )
        .await
        .unwrap();

    wait_for_deliveries(&delivery, 2).await;
    let expected = format!(
        "Pubkey {} is now banned on relay relay.test\nReason: spam",
        spammer
    );
    let sent = delivery.sent.lock().clone();
    assert_eq!(
        sent,
        vec![(admins[0].clone(), expected.clone()), (admins[1].clone(), expected)]
    );
    assert!(content.is_empty());

    let container = runtime.container();
    let decision = container
        .policy
        .evaluate_incoming_message(&RequestContext::anonymous(), &message('2', &spammer, 1))
        .await;
    assert_eq!(decision.message(), "blocked: you are banned");

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_restart_keeps_bans_and_admins() {
    let dir = tempfile::tempdir().unwrap();
    let admin = key('a');
    let config = RelayConfig {
        work_dir: dir.path().to_path_buf(),
        admins: vec![admin.as_str().to_string()],
        ..RelayConfig::default()
    };

    {
        let runtime = RelayRuntime::new(config.clone(), HostCollaborators::default()).unwrap();
        runtime.start().await.unwrap();
        runtime
            .handle_admin(&admin, &AdminRequest::new("blockip", vec![json!("192.0.2.4")]))
            .await
            .unwrap();
        runtime.shutdown().await;
    }

    let runtime = RelayRuntime::new(config, HostCollaborators::default()).unwrap();
    runtime.start().await.unwrap();

    let listed = runtime
        .handle_admin(&admin, &AdminRequest::new("listblockedips", vec![]))
        .await
        .unwrap();
    assert_eq!(listed.to_json(), json!([{"ip": "192.0.2.4", "reason": ""}]));

    let admins = runtime
        .handle_admin(&admin, &AdminRequest::new("listadmins", vec![]))
        .await
        .unwrap();
    assert_eq!(admins.to_json(), json!([{"pubkey": admin.as_str(), "methods": ["*"]}]));

    runtime.shutdown().await;
}

#[tokio::test]
async fn test_stats_reflect_the_connection_gauge() {
    let dir = tempfile::tempdir().unwrap();
    let admin = key('a');
    let config = RelayConfig {
        work_dir: dir.path().to_path_buf(),
        admins: vec![admin.as_str().to_string()],
        ..RelayConfig::default()
    };
    let runtime = RelayRuntime::new(config, HostCollaborators::default()).unwrap();
    runtime.start().await.unwrap();

    let gauge = runtime.container().connections.clone();
    gauge.opened();
    gauge.opened();
    gauge.opened();
    gauge.closed();

    let stats = runtime
        .handle_admin(&admin, &AdminRequest::new("stats", vec![]))
        .await
        .unwrap()
        .to_json();
    assert_eq!(stats["num_connections"], json!(2));
    assert!(stats["uptime"].as_f64().unwrap() >= 0.0);

    runtime.shutdown().await;
}
