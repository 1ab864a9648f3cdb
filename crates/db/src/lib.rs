//! Record store access for craftbook.
//!
//! Everything is stored in a flat key-value namespace (see [`keys`]). The
//! [`KeyValueStore`] trait is the only way components talk to the store;
//! production uses [`RedisStore`], local runs and tests use [`MemoryStore`].

use std::sync::Arc;

pub mod keys;
pub mod maintenance;
pub mod memory_store;
pub mod redis_store;
pub mod repositories;
pub mod scan;
pub mod store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{KeyValueStore, StoreError};

/// Shared handle to the process-wide store client.
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// URL selecting the in-process [`MemoryStore`].
pub const MEMORY_STORE_URL: &str = "memory://";

/// Connect to the store named by `store_url`.
///
/// `redis://` and `rediss://` URLs open a [`RedisStore`]; `memory://` gives
/// an empty [`MemoryStore`].
pub async fn create_store(store_url: &str) -> Result<StoreHandle, StoreError> {
    if store_url == MEMORY_STORE_URL {
        tracing::warn!("Using in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }
    if store_url.starts_with("redis://") || store_url.starts_with("rediss://") {
        return Ok(Arc::new(RedisStore::connect(store_url).await?));
    }
    Err(StoreError::InvalidUrl(store_url.to_string()))
}

/// Round-trip a `PING` to verify the store is reachable.
pub async fn health_check(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.ping().await
}
