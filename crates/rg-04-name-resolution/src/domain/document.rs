//! The name mapping document served at `/.well-known/nostr.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::IdentityKey;

/// `{ "names": { name: pubkey }, "relays": { pubkey: [url] } }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameDocument {
    #[serde(default)]
    pub names: BTreeMap<String, IdentityKey>,
    #[serde(default)]
    pub relays: BTreeMap<IdentityKey, Vec<String>>,
}

impl NameDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>, id: IdentityKey) -> Self {
        self.names.insert(name.into(), id);
        self
    }

    pub fn with_relays(mut self, id: IdentityKey, relays: Vec<String>) -> Self {
        self.relays.insert(id, relays);
        self
    }

    /// The single-name document returned for a lookup of `name`.
    ///
    /// Relay hints are included only when the document has some for the
    /// resolved identity.
    pub fn resolution_for(&self, name: &str) -> Option<NameDocument> {
        let id = self.names.get(name)?;

        let mut resolution = NameDocument::new().with_name(name, id.clone());
        if let Some(relays) = self.relays.get(id) {
            resolution = resolution.with_relays(id.clone(), relays.clone());
        }
        Some(resolution)
    }
}
