//! The key-value store seam.

use async_trait::async_trait;
use craftbook_core::cleanup::Lifetime;

/// Errors from the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or rejected a command.
    #[error("Store command failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored value is not the JSON we expect.
    #[error("Corrupt value at '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The configured store URL has an unsupported scheme.
    #[error("Unsupported store URL: {0}")]
    InvalidUrl(String),
}

/// Primitive operations of the external key-value store.
///
/// Values are UTF-8 strings (JSON documents). TTLs are in seconds; `None`
/// means no expiration.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StoreError>;

    /// Write `value` only if `key` does not exist. Returns whether it was written.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<u64>,
    ) -> Result<bool, StoreError>;

    /// Overwrite an existing key, keeping its remaining TTL. Returns `false`
    /// (and writes nothing) when the key does not exist.
    async fn replace(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// One page of a cursor scan. A returned cursor of `0` ends the scan.
    ///
    /// A page may repeat keys seen on earlier pages; use
    /// [`crate::scan::scan_keys`] for a complete, de-duplicated listing.
    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), StoreError>;

    /// Delete `key`. Returns whether a key was removed.
    async fn del(&self, key: &str) -> Result<bool, StoreError>;

    async fn ttl(&self, key: &str) -> Result<Lifetime, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
