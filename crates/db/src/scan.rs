//! Complete cursor-based key enumeration.

use std::collections::HashSet;

use crate::store::{KeyValueStore, StoreError};

/// List every key matching `pattern`.
///
/// Loops until the cursor comes back to `0`; a partial scan is never
/// returned. Keys repeated across pages are reported once, in first-seen
/// order.
pub async fn scan_keys(
    store: &dyn KeyValueStore,
    pattern: &str,
    page_size: usize,
) -> Result<Vec<String>, StoreError> {
    let mut cursor = 0;
    let mut round_trips = 0usize;
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    loop {
        let (next, page) = store.scan(cursor, pattern, page_size).await?;
        round_trips += 1;
        for key in page {
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
        if next == 0 {
            break;
        }
        cursor = next;
    }

    tracing::debug!(pattern, round_trips, keys = keys.len(), "Key scan complete");
    Ok(keys)
}
