//! # Relay Configuration
//!
//! Unified configuration for every subsystem. Defaults match a fresh local
//! install; each field can be overridden from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RELAY_WORK_DIR` | `relay_wd/` |
//! | `RELAY_URL` | `relay.example.com` |
//! | `RELAY_PUBKEY_WHITE_LISTED` | `false` |
//! | `RELAY_KIND_WHITE_LISTED` | `false` |
//! | `RELAY_ADMINS` | empty, comma separated identity keys |
//! | `RELAY_NOTIFICATION_QUEUE` | `256` |
//! | `RELAY_NAME_SWEEP_SECS` | `21600` |
//! | `RELAY_NAME_IDLE_SECS` | `3600` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rg_01_access_control::adapters::DEFAULT_QUEUE_CAPACITY;
use rg_02_policy_engine::PolicyConfig;
use rg_04_name_resolution::{NameCacheConfig, DEFAULT_IDLE_THRESHOLD, DEFAULT_SWEEP_INTERVAL};
use shared_types::IdentityKey;
use thiserror::Error;
use tracing::warn;

/// Complete relay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Directory holding `management.json` and `nip05.json`.
    pub work_dir: PathBuf,
    /// Relay address quoted in admin notifications.
    pub relay_url: String,
    /// Policy switches for the allow lists.
    pub policy: PolicyConfig,
    /// Identity keys granted every admin method at startup. These are also
    /// the recipients of admin notifications.
    pub admins: Vec<String>,
    /// Capacity of the notification queue.
    pub notification_queue: usize,
    /// Name cache timing.
    pub names: NameCacheConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("relay_wd/"),
            relay_url: "relay.example.com".to_string(),
            policy: PolicyConfig::default(),
            admins: Vec::new(),
            notification_queue: DEFAULT_QUEUE_CAPACITY,
            names: NameCacheConfig {
                sweep_interval: DEFAULT_SWEEP_INTERVAL,
                idle_threshold: DEFAULT_IDLE_THRESHOLD,
            },
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RELAY_ADMINS entry {0:?} is not a 64 character hex key")]
    MalformedAdminKey(String),

    #[error("RELAY_NOTIFICATION_QUEUE must be greater than zero")]
    ZeroQueueCapacity,

    #[error("RELAY_NAME_SWEEP_SECS must be greater than zero")]
    ZeroSweepInterval,
}

fn flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parsed<T: FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        warn!("Ignoring {}={:?}: not a valid value", key, value);
    }
    parsed
}

impl RelayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup` on top of `Default`.
    ///
    /// Unparseable values are logged and the default is kept, so a typo
    /// never silently flips an allow list on.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("RELAY_WORK_DIR") {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("RELAY_URL") {
            config.relay_url = url;
        }

        if let Some(v) = lookup("RELAY_PUBKEY_WHITE_LISTED") {
            match flag(&v) {
                Some(on) => config.policy.identity_allow_list = on,
                None => warn!("Ignoring RELAY_PUBKEY_WHITE_LISTED={:?}", v),
            }
        }
        if let Some(v) = lookup("RELAY_KIND_WHITE_LISTED") {
            match flag(&v) {
                Some(on) => config.policy.kind_allow_list = on,
                None => warn!("Ignoring RELAY_KIND_WHITE_LISTED={:?}", v),
            }
        }

        if let Some(list) = lookup("RELAY_ADMINS") {
            config.admins = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(cap) = lookup("RELAY_NOTIFICATION_QUEUE")
            .and_then(|v| parsed::<usize>("RELAY_NOTIFICATION_QUEUE", &v))
        {
            config.notification_queue = cap;
        }
        if let Some(secs) = lookup("RELAY_NAME_SWEEP_SECS")
            .and_then(|v| parsed::<u64>("RELAY_NAME_SWEEP_SECS", &v))
        {
            config.names.sweep_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("RELAY_NAME_IDLE_SECS")
            .and_then(|v| parsed::<u64>("RELAY_NAME_IDLE_SECS", &v))
        {
            config.names.idle_threshold = Duration::from_secs(secs);
        }

        config
    }

    /// Validate the configuration before anything touches disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.admin_keys()?;
        if self.notification_queue == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.names.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }

    /// The configured admins as normalized identity keys.
    pub fn admin_keys(&self) -> Result<Vec<IdentityKey>, ConfigError> {
        self.admins
            .iter()
            .map(|raw| {
                IdentityKey::parse(raw).ok_or_else(|| ConfigError::MalformedAdminKey(raw.clone()))
            })
            .collect()
    }
}
