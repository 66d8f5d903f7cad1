//! # Core Relay Entities
//!
//! ## Clusters
//!
//! - **Keys**: `IdentityKey`, `ContentId`
//! - **Classification**: `Kind`
//! - **Messages**: `Tag`, `Message`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a hex-encoded 32-byte key or id.
pub const HEX_KEY_LEN: usize = 64;

fn is_hex_key(value: &str) -> bool {
    value.len() == HEX_KEY_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

// =============================================================================
// CLUSTER A: KEYS
// =============================================================================

/// Public key identifying the author of a message or an administrative caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Wrap a key without validation.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Parse a key, accepting only 64 hex characters.
    pub fn parse(key: &str) -> Option<Self> {
        is_hex_key(key).then(|| Self(key.to_ascii_lowercase()))
    }

    /// Whether the key is 64 hex characters.
    pub fn is_well_formed(&self) -> bool {
        is_hex_key(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IdentityKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier of one stored message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Whether the id is 64 hex characters.
    pub fn is_well_formed(&self) -> bool {
        is_hex_key(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// CLUSTER B: CLASSIFICATION
// =============================================================================

/// Small integer classifying the semantic type of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u16);

impl Kind {
    /// Reports flagging other content (NIP-56).
    pub const REPORTING: Kind = Kind(1984);
    /// Gift-wrapped direct messages (NIP-59).
    pub const GIFT_WRAP: Kind = Kind(1059);

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Kind {
    fn from(value: u16) -> Self {
        Kind(value)
    }
}

// =============================================================================
// CLUSTER C: MESSAGES
// =============================================================================

/// A message tag: a key followed by its values, e.g. `["e", "<id>", "<relay>"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// First element of the tag.
    pub fn key(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Second element of the tag.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// An inbound message as seen by the moderation core.
///
/// Signature and wire framing are handled by the transport; only the fields
/// the policy checks look at are carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: ContentId,
    #[serde(rename = "pubkey")]
    pub author: IdentityKey,
    pub kind: Kind,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(id: impl Into<ContentId>, author: impl Into<IdentityKey>, kind: Kind) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            kind,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Values of every tag with the given key.
    pub fn tag_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.key() == Some(key))
            .filter_map(Tag::value)
    }
}
