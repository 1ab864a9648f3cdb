//! Repository for the shared `community:crafts[:<suffix>]` lists.

use craftbook_core::craft::CraftRecord;

use crate::keys::community_key;
use crate::store::{KeyValueStore, StoreError};

/// Provides read/write access to community craft lists.
pub struct CommunityRepo;

impl CommunityRepo {
    /// Load a community list. A missing key is an empty list.
    pub async fn get(
        store: &dyn KeyValueStore,
        suffix: Option<&str>,
    ) -> Result<Vec<CraftRecord>, StoreError> {
        let key = community_key(suffix);
        match store.get(&key).await? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source })
            }
            None => Ok(Vec::new()),
        }
    }

    /// Replace a community list. Community lists never expire.
    pub async fn put(
        store: &dyn KeyValueStore,
        suffix: Option<&str>,
        records: &[CraftRecord],
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(records)?;
        store.set(&community_key(suffix), &value, None).await
    }

    /// Append records, skipping exact duplicates of entries already listed.
    ///
    /// Returns the number of records added and the resulting list.
    pub async fn append(
        store: &dyn KeyValueStore,
        suffix: Option<&str>,
        records: Vec<CraftRecord>,
    ) -> Result<(usize, Vec<CraftRecord>), StoreError> {
        let mut list = Self::get(store, suffix).await?;
        let mut added = 0;
        for record in records {
            if !list.contains(&record) {
                list.push(record);
                added += 1;
            }
        }
        if added > 0 {
            Self::put(store, suffix, &list).await?;
        }
        Ok((added, list))
    }
}
