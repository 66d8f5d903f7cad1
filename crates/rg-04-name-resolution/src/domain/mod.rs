pub mod cache;
pub mod document;

pub use cache::{
    NameCache, NameCacheConfig, NameCacheEntry, Timestamp, DEFAULT_IDLE_THRESHOLD,
    DEFAULT_SWEEP_INTERVAL,
};
pub use document::NameDocument;
