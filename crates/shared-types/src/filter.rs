//! Subscription filters as requested by readers.

use crate::entities::{IdentityKey, Kind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reader's subscription filter.
///
/// Tag dimensions are keyed the way clients send them, e.g. `"#p"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubscriptionFilter {
    #[serde(default)]
    pub authors: Vec<IdentityKey>,
    #[serde(default)]
    pub kinds: Vec<Kind>,
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl SubscriptionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn tag<I, S>(mut self, dimension: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(dimension.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn requests_kind(&self, kind: Kind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Values requested for one tag dimension.
    pub fn tag_values(&self, dimension: &str) -> &[String] {
        self.tags.get(dimension).map(Vec::as_slice).unwrap_or(&[])
    }
}
