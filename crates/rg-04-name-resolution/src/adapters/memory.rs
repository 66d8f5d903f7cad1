use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::domain::NameDocument;
use crate::error::NameError;
use crate::ports::NameDocumentStore;

/// In-memory document that counts loads, for cache tests.
#[derive(Default)]
pub struct InMemoryNameStore {
    document: Mutex<NameDocument>,
    loads: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryNameStore {
    pub fn new(document: NameDocument) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn document(&self) -> NameDocument {
        self.document.lock().clone()
    }
}

impl NameDocumentStore for InMemoryNameStore {
    fn load(&self) -> Result<NameDocument, NameError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NameError::Unavailable("injected failure".into()));
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.document.lock().clone())
    }

    fn save(&self, document: &NameDocument) -> Result<(), NameError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NameError::Unavailable("injected failure".into()));
        }
        *self.document.lock() = document.clone();
        Ok(())
    }
}
