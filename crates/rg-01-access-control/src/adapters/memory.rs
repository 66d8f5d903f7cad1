//! In-memory adapters for tests and the development runtime.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::Message;

use crate::domain::{AccessControlState, Notice};
use crate::error::{ContentStoreError, StateFileError};
use crate::ports::{ContentQuery, ContentStore, Notifier, StatePersistence};

// =============================================================================
// Persistence
// =============================================================================

/// Keeps the last saved state in memory.
#[derive(Default)]
pub struct InMemoryPersistence {
    saved: Mutex<Option<AccessControlState>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AccessControlState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Make every following `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Option<AccessControlState> {
        self.saved.lock().clone()
    }
}

impl StatePersistence for InMemoryPersistence {
    fn load(&self) -> Result<Option<AccessControlState>, StateFileError> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, state: &AccessControlState) -> Result<(), StateFileError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StateFileError::Unavailable("injected save failure".into()));
        }
        *self.saved.lock() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Content store
// =============================================================================

/// A list of messages with optional injected failures.
#[derive(Default)]
pub struct InMemoryContentStore {
    messages: Mutex<Vec<Message>>,
    fail_queries: AtomicBool,
    fail_deletes: AtomicBool,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Mutex::new(messages),
            ..Self::default()
        }
    }

    pub fn insert(&self, message: Message) {
        self.messages.lock().push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn contains(&self, message: &Message) -> bool {
        self.messages.lock().iter().any(|m| m.id == message.id)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn query(&self, query: &ContentQuery) -> Result<Vec<Message>, ContentStoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(ContentStoreError::Query("injected query failure".into()));
        }
        let messages = self.messages.lock();
        let found = messages
            .iter()
            .filter(|m| match query {
                ContentQuery::ByAuthor(author) => &m.author == author,
                ContentQuery::ById(id) => &m.id == id,
            })
            .cloned()
            .collect();
        Ok(found)
    }

    async fn delete(&self, message: &Message) -> Result<(), ContentStoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ContentStoreError::Delete("injected delete failure".into()));
        }
        self.messages.lock().retain(|m| m.id != message.id);
        Ok(())
    }
}

// =============================================================================
// Notifiers
// =============================================================================

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Keeps every notice for later inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
