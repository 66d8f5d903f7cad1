//! # Test Fixtures
//!
//! A relay wired from real services over in-memory adapters.

use std::sync::Arc;

use relay_runtime::ConnectionGauge;
use rg_01_access_control::{
    AccessControlDependencies, AccessControlStore, InMemoryContentStore, InMemoryPersistence,
    RecordingNotifier,
};
use rg_02_policy_engine::{PolicyConfig, PolicyEngine};
use rg_03_admin_dispatch::{AdminDispatchDependencies, AdminDispatcher};
use rg_04_name_resolution::{InMemoryNameStore, ManualClock, NameCacheConfig, NameDocument, NameResolver};
use shared_types::{IdentityKey, Kind, Message};

/// 64 hex characters made of `c`.
pub fn key(c: char) -> IdentityKey {
    IdentityKey::new(c.to_string().repeat(64))
}

pub fn root() -> IdentityKey {
    key('0')
}

/// A message whose id is `id_char` repeated.
pub fn message(id_char: char, author: &IdentityKey, kind: u16) -> Message {
    Message::new(id_char.to_string().repeat(64), author.clone(), Kind(kind))
}

pub struct TestRelay {
    pub store: Arc<AccessControlStore>,
    pub policy: PolicyEngine,
    pub dispatcher: AdminDispatcher,
    pub names: Arc<NameResolver>,
    pub content: Arc<InMemoryContentStore>,
    pub persistence: Arc<InMemoryPersistence>,
    pub notices: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

impl TestRelay {
    /// Build a relay with `root()` as the only (wildcard) admin.
    pub async fn new(config: PolicyConfig, content: Vec<Message>) -> Self {
        let content = Arc::new(InMemoryContentStore::with_messages(content));
        let persistence = Arc::new(InMemoryPersistence::new());
        let notices = Arc::new(RecordingNotifier::new());

        let store = Arc::new(
            AccessControlStore::open(AccessControlDependencies {
                persistence: persistence.clone(),
                notifier: notices.clone(),
                content_stores: vec![content.clone()],
            })
            .expect("in-memory store opens"),
        );
        store
            .bootstrap_admins(&[root()])
            .await
            .expect("in-memory bootstrap succeeds");

        let clock = Arc::new(ManualClock::new(0));
        let names = Arc::new(NameResolver::new(
            Arc::new(InMemoryNameStore::new(NameDocument::new())),
            clock.clone(),
            NameCacheConfig::default(),
        ));

        let dispatcher = AdminDispatcher::new(AdminDispatchDependencies {
            store: store.clone(),
            names: names.clone(),
            stats: Arc::new(ConnectionGauge::new()),
            notifier: notices.clone(),
        });

        Self {
            policy: PolicyEngine::new(store.clone(), config),
            store,
            dispatcher,
            names,
            content,
            persistence,
            notices,
            clock,
        }
    }

    pub async fn open() -> Self {
        Self::new(PolicyConfig::default(), Vec::new()).await
    }
}
