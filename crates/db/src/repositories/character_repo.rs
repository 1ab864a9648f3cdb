//! Repository for `character:<shareId>` documents.

use craftbook_core::character::CharacterDocument;
use craftbook_core::cleanup::Lifetime;

use crate::keys::{character_key, share_id_from_key, CHARACTER_PATTERN, DEFAULT_SCAN_PAGE_SIZE};
use crate::scan::scan_keys;
use crate::store::{KeyValueStore, StoreError};

/// A character document together with its store metadata.
#[derive(Debug, Clone)]
pub struct StoredCharacter {
    pub key: String,
    pub document: CharacterDocument,
    pub lifetime: Lifetime,
}

/// Result of a full character scan.
#[derive(Debug, Default)]
pub struct CharacterListing {
    /// Readable documents, in scan order.
    pub characters: Vec<StoredCharacter>,
    /// Keys whose value vanished or could not be decoded.
    pub skipped: Vec<String>,
}

/// Provides CRUD operations for character documents.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Find a character by share id.
    ///
    /// A stored value that is not a character document is reported as
    /// [`StoreError::Corrupt`] rather than as missing.
    pub async fn find(
        store: &dyn KeyValueStore,
        share_id: &str,
    ) -> Result<Option<CharacterDocument>, StoreError> {
        let key = character_key(share_id);
        match store.get(&key).await? {
            Some(raw) => decode(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Store a new document unless its share id is already taken.
    ///
    /// `ttl` of `None` makes the character permanent. Returns `false` when
    /// the key already exists (nothing is written).
    pub async fn create_if_absent(
        store: &dyn KeyValueStore,
        document: &CharacterDocument,
        ttl: Option<u64>,
    ) -> Result<bool, StoreError> {
        let value = serde_json::to_string(document)?;
        store
            .set_if_absent(&character_key(&document.share_id), &value, ttl)
            .await
    }

    /// Overwrite an existing document, keeping its lifetime.
    ///
    /// Returns `false` when the character no longer exists.
    pub async fn update(
        store: &dyn KeyValueStore,
        document: &CharacterDocument,
    ) -> Result<bool, StoreError> {
        let value = serde_json::to_string(document)?;
        store.replace(&character_key(&document.share_id), &value).await
    }

    /// Delete a character. Returns whether it existed.
    pub async fn delete(store: &dyn KeyValueStore, share_id: &str) -> Result<bool, StoreError> {
        store.del(&character_key(share_id)).await
    }

    /// Load every stored character with its lifetime.
    ///
    /// Undecodable documents are logged and listed in
    /// [`CharacterListing::skipped`]; they never abort the scan.
    pub async fn list_all(store: &dyn KeyValueStore) -> Result<CharacterListing, StoreError> {
        let keys = scan_keys(store, CHARACTER_PATTERN, DEFAULT_SCAN_PAGE_SIZE).await?;
        let mut listing = CharacterListing::default();

        for key in keys {
            let Some(raw) = store.get(&key).await? else {
                // Expired or deleted between the scan and the read.
                listing.skipped.push(key);
                continue;
            };
            let document = match decode(&key, &raw) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable character document");
                    listing.skipped.push(key);
                    continue;
                }
            };
            let lifetime = store.ttl(&key).await?;
            listing.characters.push(StoredCharacter {
                key,
                document,
                lifetime,
            });
        }

        Ok(listing)
    }
}

/// Decode a stored document. Legacy documents written without a share id
/// take it from their key.
fn decode(key: &str, raw: &str) -> Result<CharacterDocument, StoreError> {
    let mut document: CharacterDocument =
        serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
    if document.share_id.is_empty() {
        if let Some(share_id) = share_id_from_key(key) {
            document.share_id = share_id.to_string();
        }
    }
    Ok(document)
}
