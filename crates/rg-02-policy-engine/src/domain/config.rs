use serde::{Deserialize, Serialize};

/// Relay-wide policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Only identities on the allow list may publish or upload.
    pub identity_allow_list: bool,
    /// Only kinds on the allow list may be published.
    pub kind_allow_list: bool,
}
