//! Cache of resolved cross-references (`xref:<kind>:<id>`).
//!
//! Only the counterpart id is stored. Callers rebuild the URL on the
//! host/edition/locale of whatever URL they are resolving, so one cached
//! entry serves every locale.

use craftbook_core::identifier::{parse_resource, ResourceKind};

use crate::keys::xref_key;
use crate::store::{KeyValueStore, StoreError};

pub struct XrefRepo;

impl XrefRepo {
    /// Cached counterpart id for resource `kind=id`.
    ///
    /// Entries written as full URLs are still understood.
    pub async fn get(
        store: &dyn KeyValueStore,
        kind: ResourceKind,
        id: u64,
    ) -> Result<Option<u64>, StoreError> {
        let Some(raw) = store.get(&xref_key(kind, id)).await? else {
            return Ok(None);
        };
        let target = raw
            .trim()
            .parse()
            .ok()
            .or_else(|| parse_resource(&raw).filter(|r| r.kind != kind).map(|r| r.id));
        if target.is_none() {
            tracing::debug!(%kind, id, value = %raw, "Ignoring unreadable xref entry");
        }
        Ok(target)
    }

    pub async fn put(
        store: &dyn KeyValueStore,
        kind: ResourceKind,
        id: u64,
        target_id: u64,
        ttl: u64,
    ) -> Result<(), StoreError> {
        store
            .set(&xref_key(kind, id), &target_id.to_string(), Some(ttl))
            .await
    }
}
