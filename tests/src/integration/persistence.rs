//! # Restart Scenarios
//!
//! State written through the real file adapters must come back unchanged.

use std::sync::Arc;
use std::time::Duration;

use rg_01_access_control::{
    AccessControlDependencies, AccessControlStore, AdminMethod, JsonStateFile, MethodSet,
    NoopNotifier, StatePersistence,
};
use rg_02_policy_engine::{PolicyConfig, PolicyDecision, PolicyEngine};
use rg_04_name_resolution::{
    JsonNameFile, ManualClock, NameCacheConfig, NameDocument, NameDocumentStore, NameResolver,
};
use shared_types::{Kind, RequestContext};

use super::fixtures::{key, message, root};

fn open_store(dir: &std::path::Path) -> AccessControlStore {
    AccessControlStore::open(AccessControlDependencies {
        persistence: Arc::new(JsonStateFile::in_dir(dir)),
        notifier: Arc::new(NoopNotifier),
        content_stores: Vec::new(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_access_control_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let banned = key('c');
    let moderator = key('d');

    let before = {
        let store = open_store(dir.path());
        store.bootstrap_admins(&[root()]).await.unwrap();
        store.ban_identity(banned.clone(), "spam").await.unwrap();
        store.allow_identity(key('b'), "member").await.unwrap();
        store.disallow_kind(Kind(4)).await.unwrap();
        store
            .block_address("192.0.2.9".parse().unwrap(), "flood")
            .await
            .unwrap();
        store
            .grant_admin(&root(), moderator.clone(), MethodSet::from([AdminMethod::BanEvent]))
            .await
            .unwrap();
        store
            .record_for_report("e".repeat(64).into(), "report")
            .await
            .unwrap();
        store.snapshot().await
    };

    let reopened = Arc::new(open_store(dir.path()));
    assert_eq!(reopened.snapshot().await, before);

    let policy = PolicyEngine::new(reopened.clone(), PolicyConfig::default());
    let ctx = RequestContext::anonymous();
    assert_eq!(
        policy
            .evaluate_incoming_message(&ctx, &message('1', &banned, 1))
            .await
            .message(),
        "blocked: you are banned"
    );
    assert_eq!(
        policy
            .evaluate_incoming_message(&ctx, &message('1', &key('b'), 4))
            .await
            .message(),
        "blocked: kind not allowed"
    );
    assert_eq!(
        policy
            .evaluate_incoming_message(&ctx, &message('1', &key('b'), 1))
            .await,
        PolicyDecision::Accept
    );
    assert_eq!(
        reopened.admin_methods(&moderator).await,
        Some(MethodSet::from([AdminMethod::BanEvent]))
    );
}

#[tokio::test]
async fn test_state_file_uses_stable_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    store.bootstrap_admins(&[root()]).await.unwrap();
    store
        .block_address("192.0.2.9".parse().unwrap(), "flood")
        .await
        .unwrap();

    let raw = std::fs::read(JsonStateFile::in_dir(dir.path()).path()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    for field in [
        "allowed_keys",
        "banned_keys",
        "allowed_kinds",
        "disallowed_kinds",
        "blocked_ips",
        "banned_events",
        "moderation_events",
        "admins",
    ] {
        assert!(value.get(field).is_some(), "Failed for: {}", field);
    }
    assert_eq!(value["blocked_ips"]["192.0.2.9"], "flood");
    assert_eq!(value["admins"][root().as_str()], serde_json::json!(["*"]));
}

#[test]
fn test_partial_state_file_loads_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let file = JsonStateFile::in_dir(dir.path());
    std::fs::write(
        file.path(),
        serde_json::json!({"banned_keys": {("a".repeat(64)): "old"}}).to_string(),
    )
    .unwrap();

    let state = file.load().unwrap().unwrap();
    assert_eq!(state.banned_identities.len(), 1);
    assert!(state.admins.is_empty());
    assert!(state.blocked_addresses.is_empty());
}

#[test]
fn test_name_mappings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));

    let resolver = NameResolver::new(
        Arc::new(JsonNameFile::in_dir(dir.path())),
        clock.clone(),
        NameCacheConfig::default(),
    );
    resolver.set_mapping("alice", key('a')).unwrap();
    resolver.set_mapping("bob", key('b')).unwrap();
    assert!(resolver.remove_mapping("bob").unwrap());

    let restarted = NameResolver::new(
        Arc::new(JsonNameFile::in_dir(dir.path())),
        clock,
        NameCacheConfig::default(),
    );
    assert_eq!(restarted.resolve("alice").unwrap().names["alice"], key('a'));
    assert!(restarted.resolve("bob").unwrap_err().is_not_found());
}

#[test]
fn test_cached_name_is_served_until_swept() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let external = JsonNameFile::in_dir(dir.path());
    external
        .save(&NameDocument::new().with_name("carol", key('c')))
        .unwrap();

    let resolver = NameResolver::new(
        Arc::new(JsonNameFile::in_dir(dir.path())),
        clock.clone(),
        NameCacheConfig::default(),
    );
    assert_eq!(resolver.resolve("carol").unwrap().names["carol"], key('c'));

    // Another writer changes the file behind the cache.
    external
        .save(&NameDocument::new().with_name("carol", key('d')))
        .unwrap();
    assert_eq!(resolver.resolve("carol").unwrap().names["carol"], key('c'));

    clock.advance(Duration::from_secs(3599));
    assert_eq!(resolver.sweep(), 0);

    clock.advance(Duration::from_secs(3600));
    assert_eq!(resolver.sweep(), 1);
    assert_eq!(resolver.resolve("carol").unwrap().names["carol"], key('d'));
}
