//! Enrichment merger: fill missing recipe/item cross-references.
//!
//! The merger is generic over [`CrossReferenceResolver`] and has no store
//! side effects. Callers decide whether the returned records are persisted
//! (see `dry_run`).

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::craft::CraftRecord;
use crate::identifier::{parse_resource, ResourceKind};

/// Default number of records resolved concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Best-effort resolution between recipe and item URLs.
///
/// Implementations must not fail: an unresolved lookup is an expected
/// outcome, reported as the input URL (recipe direction) or `None` (item
/// direction).
#[async_trait]
pub trait CrossReferenceResolver: Send + Sync {
    /// Return the recipe URL for `url`, or `url` (normalized) if none found.
    async fn resolve_recipe_from_url(&self, url: &str) -> String;

    /// Return the item URL produced by `recipe_url`, if one can be found.
    async fn resolve_item_from_recipe_url(&self, recipe_url: &str) -> Option<String>;
}

/// Result of an enrichment pass.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentOutcome {
    pub records: Vec<CraftRecord>,
    /// Number of records with at least one field filled in.
    pub updated: usize,
    /// Whether the caller asked for a preview only.
    pub dry_run: bool,
}

/// Enrich a single record.
///
/// Step 1 fills `recipe_url` from `item_url`; step 2 fills `item_url` from
/// the (possibly just resolved) `recipe_url`. Populated fields are never
/// overwritten. Returns the record and whether it changed.
pub async fn enrich_record(
    resolver: &dyn CrossReferenceResolver,
    mut record: CraftRecord,
) -> (CraftRecord, bool) {
    let mut changed = false;

    if record.recipe_url().is_none() {
        if let Some(item_url) = record.item_url().map(str::to_owned) {
            let resolved = resolver.resolve_recipe_from_url(&item_url).await;
            let is_recipe = parse_resource(&resolved).map(|r| r.kind) == Some(ResourceKind::Recipe);
            if resolved != item_url && is_recipe {
                record.set_recipe_url(resolved);
                changed = true;
            }
        }
    }

    if record.item_url().is_none() {
        if let Some(recipe_url) = record.recipe_url().map(str::to_owned) {
            if let Some(item_url) = resolver.resolve_item_from_recipe_url(&recipe_url).await {
                record.set_item_url(item_url);
                changed = true;
            }
        }
    }

    (record, changed)
}

/// Enrich a batch, resolving up to `concurrency` records at once.
///
/// Output order matches input order.
pub async fn enrich_records(
    resolver: &dyn CrossReferenceResolver,
    records: Vec<CraftRecord>,
    dry_run: bool,
    concurrency: usize,
) -> EnrichmentOutcome {
    let results: Vec<(CraftRecord, bool)> = stream::iter(records)
        .map(|record| enrich_record(resolver, record))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let updated = results.iter().filter(|(_, changed)| *changed).count();
    let records = results.into_iter().map(|(record, _)| record).collect();

    tracing::debug!(updated, dry_run, "Enrichment pass finished");

    EnrichmentOutcome {
        records,
        updated,
        dry_run,
    }
}
