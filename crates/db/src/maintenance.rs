//! Store-wide maintenance runs: duplicate cleanup and persisted enrichment.
//!
//! These are the persisting counterparts of the pure planners in
//! `craftbook_core`. Both the API admin routes and the worker CLI call
//! them.

use chrono::Utc;
use craftbook_core::character::CharacterDocument;
use craftbook_core::cleanup::{plan_cleanup, CleanupCandidate, PermanentTieBreak};
use craftbook_core::craft::CraftRecord;
use craftbook_core::enrichment::{enrich_records, CrossReferenceResolver};
use serde::Serialize;

use crate::repositories::{CharacterRepo, CommunityRepo};
use crate::store::{KeyValueStore, StoreError};

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Summary of one cleanup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Character keys found by the scan.
    pub scanned: usize,
    /// Keys left alone because their document was unreadable or vanished.
    pub skipped: usize,
    pub deleted: usize,
    pub survivors: usize,
    pub deleted_keys: Vec<String>,
}

/// Remove duplicate characters, keeping one survivor per natural key.
///
/// Scan-then-delete without a transaction: a key already gone at delete
/// time is not counted as deleted.
pub async fn run_cleanup(
    store: &dyn KeyValueStore,
    tie_break: PermanentTieBreak,
) -> Result<CleanupReport, StoreError> {
    let listing = CharacterRepo::list_all(store).await?;

    let candidates: Vec<CleanupCandidate> = listing
        .characters
        .iter()
        .map(|stored| CleanupCandidate {
            key: stored.key.clone(),
            natural_key: stored.document.natural_key(),
            lifetime: stored.lifetime,
            updated_at: stored.document.updated_at,
        })
        .collect();

    let plan = plan_cleanup(&candidates, tie_break);

    let mut deleted_keys = Vec::with_capacity(plan.delete.len());
    for key in plan.delete {
        if store.del(&key).await? {
            tracing::info!(key = %key, "Deleted duplicate character");
            deleted_keys.push(key);
        }
    }

    let report = CleanupReport {
        scanned: listing.characters.len() + listing.skipped.len(),
        skipped: listing.skipped.len(),
        deleted: deleted_keys.len(),
        survivors: plan.keep.len(),
        deleted_keys,
    };
    tracing::info!(
        scanned = report.scanned,
        deleted = report.deleted,
        survivors = report.survivors,
        skipped = report.skipped,
        %tie_break,
        "Cleanup finished",
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Result of enriching one character document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEnrichment {
    pub character: CharacterDocument,
    pub updated: usize,
    pub dry_run: bool,
    /// Whether the enriched document was written back.
    pub persisted: bool,
}

/// Result of enriching one community list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEnrichment {
    pub records: Vec<CraftRecord>,
    pub updated: usize,
    pub dry_run: bool,
    pub persisted: bool,
}

/// Summary of a pass over every stored character.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnrichmentReport {
    pub characters: usize,
    pub updated_characters: usize,
    pub updated_records: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

/// Enrich every profession list of one character.
///
/// Returns `None` when the character does not exist. The document is
/// written back only when `!dry_run` and at least one record changed, and
/// it keeps its remaining lifetime.
pub async fn enrich_character(
    store: &dyn KeyValueStore,
    resolver: &dyn CrossReferenceResolver,
    share_id: &str,
    dry_run: bool,
    concurrency: usize,
) -> Result<Option<CharacterEnrichment>, StoreError> {
    let Some(document) = CharacterRepo::find(store, share_id).await? else {
        return Ok(None);
    };
    enrich_document(store, resolver, document, dry_run, concurrency)
        .await
        .map(Some)
}

async fn enrich_document(
    store: &dyn KeyValueStore,
    resolver: &dyn CrossReferenceResolver,
    mut document: CharacterDocument,
    dry_run: bool,
    concurrency: usize,
) -> Result<CharacterEnrichment, StoreError> {
    let mut updated = 0;
    let professions = std::mem::take(&mut document.professions);
    for (profession, crafts) in professions {
        let outcome = enrich_records(resolver, crafts, dry_run, concurrency).await;
        updated += outcome.updated;
        document.professions.insert(profession, outcome.records);
    }

    let mut persisted = false;
    if !dry_run && updated > 0 {
        document.updated_at = Some(Utc::now());
        persisted = CharacterRepo::update(store, &document).await?;
        if !persisted {
            tracing::warn!(share_id = %document.share_id, "Character vanished during enrichment");
        }
    }

    tracing::debug!(share_id = %document.share_id, updated, dry_run, persisted, "Character enriched");
    Ok(CharacterEnrichment {
        character: document,
        updated,
        dry_run,
        persisted,
    })
}

/// Enrich a community list in place (unless `dry_run`).
pub async fn enrich_community(
    store: &dyn KeyValueStore,
    resolver: &dyn CrossReferenceResolver,
    suffix: Option<&str>,
    dry_run: bool,
    concurrency: usize,
) -> Result<CommunityEnrichment, StoreError> {
    let records = CommunityRepo::get(store, suffix).await?;
    let outcome = enrich_records(resolver, records, dry_run, concurrency).await;

    let persisted = !dry_run && outcome.updated > 0;
    if persisted {
        CommunityRepo::put(store, suffix, &outcome.records).await?;
    }

    tracing::debug!(suffix, updated = outcome.updated, dry_run, persisted, "Community list enriched");
    Ok(CommunityEnrichment {
        records: outcome.records,
        updated: outcome.updated,
        dry_run,
        persisted,
    })
}

/// Enrich every stored character, one document at a time.
pub async fn enrich_all_characters(
    store: &dyn KeyValueStore,
    resolver: &dyn CrossReferenceResolver,
    dry_run: bool,
    concurrency: usize,
) -> Result<BatchEnrichmentReport, StoreError> {
    let listing = CharacterRepo::list_all(store).await?;
    let mut report = BatchEnrichmentReport {
        skipped: listing.skipped.len(),
        dry_run,
        ..Default::default()
    };

    for stored in listing.characters {
        report.characters += 1;
        let result = enrich_document(store, resolver, stored.document, dry_run, concurrency).await?;
        if result.updated > 0 {
            report.updated_characters += 1;
            report.updated_records += result.updated;
        }
    }

    tracing::info!(
        characters = report.characters,
        updated_characters = report.updated_characters,
        updated_records = report.updated_records,
        dry_run,
        "Batch enrichment finished",
    );
    Ok(report)
}
