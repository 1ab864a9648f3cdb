//! Store-backed cache in front of a [`CrossReferenceResolver`].
//!
//! Positive results are kept under `xref:<kind>:<id>` for a fixed TTL. The
//! entry holds the counterpart id only; a hit is rebuilt on the host,
//! edition and locale of the URL being resolved. Misses are not cached, so
//! a later enrichment run retries them. Store failures are logged and
//! bypassed.

use async_trait::async_trait;
use craftbook_core::enrichment::CrossReferenceResolver;
use craftbook_core::identifier::{
    normalize_url, parse_resource, sibling_url, ResourceKind, ResourceRef, UrlDefaults,
};
use craftbook_db::repositories::XrefRepo;
use craftbook_db::StoreHandle;

/// Default cache TTL: 30 days.
pub const DEFAULT_XREF_TTL_SECS: u64 = 30 * 24 * 60 * 60;

pub struct CachingResolver<R> {
    inner: R,
    store: StoreHandle,
    ttl_secs: u64,
    defaults: UrlDefaults,
}

impl<R: CrossReferenceResolver> CachingResolver<R> {
    /// `defaults` must match the ones `inner` normalizes with.
    pub fn new(inner: R, store: StoreHandle, ttl_secs: u64, defaults: UrlDefaults) -> Self {
        Self {
            inner,
            store,
            ttl_secs,
            defaults,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn cached(&self, resource: ResourceRef) -> Option<u64> {
        match XrefRepo::get(self.store.as_ref(), resource.kind, resource.id).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(kind = %resource.kind, id = resource.id, error = %e, "Xref cache read failed");
                None
            }
        }
    }

    async fn remember(&self, resource: ResourceRef, target: ResourceRef) {
        if let Err(e) = XrefRepo::put(
            self.store.as_ref(),
            resource.kind,
            resource.id,
            target.id,
            self.ttl_secs,
        )
        .await
        {
            tracing::warn!(kind = %resource.kind, id = resource.id, error = %e, "Xref cache write failed");
        }
    }

    /// Canonical URL of `kind=id` laid out like `like`.
    fn rebuild(&self, like: &str, kind: ResourceKind, id: u64) -> String {
        let normalized = normalize_url(like, &self.defaults);
        sibling_url(&normalized, ResourceRef { kind, id }, &self.defaults)
    }
}

fn resource_of(url: &str, kind: ResourceKind) -> Option<ResourceRef> {
    parse_resource(url).filter(|r| r.kind == kind)
}

#[async_trait]
impl<R: CrossReferenceResolver> CrossReferenceResolver for CachingResolver<R> {
    async fn resolve_recipe_from_url(&self, url: &str) -> String {
        // Only item URLs cost a fetch.
        let Some(item) = resource_of(url, ResourceKind::Item) else {
            return self.inner.resolve_recipe_from_url(url).await;
        };
        if let Some(recipe_id) = self.cached(item).await {
            return self.rebuild(url, ResourceKind::Recipe, recipe_id);
        }

        let resolved = self.inner.resolve_recipe_from_url(url).await;
        if let Some(recipe) = resource_of(&resolved, ResourceKind::Recipe) {
            self.remember(item, recipe).await;
        }
        resolved
    }

    async fn resolve_item_from_recipe_url(&self, recipe_url: &str) -> Option<String> {
        let Some(recipe) = resource_of(recipe_url, ResourceKind::Recipe) else {
            return self.inner.resolve_item_from_recipe_url(recipe_url).await;
        };
        if let Some(item_id) = self.cached(recipe).await {
            return Some(self.rebuild(recipe_url, ResourceKind::Item, item_id));
        }

        let resolved = self.inner.resolve_item_from_recipe_url(recipe_url).await?;
        if let Some(item) = resource_of(&resolved, ResourceKind::Item) {
            self.remember(recipe, item).await;
        }
        Some(resolved)
    }
}
