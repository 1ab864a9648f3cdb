//! Redirect-following recipe/item resolution.
//!
//! Wowhead redirects an item page requested with the `#teaches` anchor to
//! the recipe that teaches it, when there is one. Failing that, the first
//! recipe link in the page body is taken. In the other direction the
//! recipe page body is scanned for the first item link.

use async_trait::async_trait;
use craftbook_core::enrichment::CrossReferenceResolver;
use craftbook_core::identifier::{
    find_resource_id, normalize_url, parse_resource, sibling_url, ResourceKind, ResourceRef,
    UrlDefaults,
};

use crate::api::{PageFetcher, WowheadApi};

/// Anchor asking Wowhead for the teaching recipe of an item.
pub const TEACHES_ANCHOR: &str = "#teaches";

/// [`CrossReferenceResolver`] backed by Wowhead pages.
pub struct WowheadResolver<F = WowheadApi> {
    fetcher: F,
    defaults: UrlDefaults,
}

impl<F: PageFetcher> WowheadResolver<F> {
    pub fn new(fetcher: F, defaults: UrlDefaults) -> Self {
        Self { fetcher, defaults }
    }

    pub fn defaults(&self) -> &UrlDefaults {
        &self.defaults
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn canonical(&self, like: &str, kind: ResourceKind, id: u64) -> String {
        sibling_url(like, ResourceRef { kind, id }, &self.defaults)
    }
}

#[async_trait]
impl<F: PageFetcher> CrossReferenceResolver for WowheadResolver<F> {
    async fn resolve_recipe_from_url(&self, url: &str) -> String {
        let normalized = normalize_url(url, &self.defaults);
        let Some(resource) = parse_resource(&normalized) else {
            return normalized;
        };
        if resource.kind != ResourceKind::Item {
            return normalized;
        }

        let page = match self
            .fetcher
            .fetch_page(&format!("{normalized}{TEACHES_ANCHOR}"))
            .await
        {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(url = %normalized, error = %e, "Recipe lookup failed");
                return normalized;
            }
        };

        let recipe_id = find_resource_id(ResourceKind::Recipe, &page.final_url)
            .or_else(|| find_resource_id(ResourceKind::Recipe, &page.body));

        match recipe_id {
            Some(id) => {
                let recipe_url = self.canonical(&normalized, ResourceKind::Recipe, id);
                tracing::debug!(item = %normalized, recipe = %recipe_url, "Resolved recipe");
                recipe_url
            }
            None => normalized,
        }
    }

    async fn resolve_item_from_recipe_url(&self, recipe_url: &str) -> Option<String> {
        let normalized = normalize_url(recipe_url, &self.defaults);
        let page = match self.fetcher.fetch_page(&normalized).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(url = %normalized, error = %e, "Item lookup failed");
                return None;
            }
        };

        let id = find_resource_id(ResourceKind::Item, &page.body)?;
        let item_url = self.canonical(&normalized, ResourceKind::Item, id);
        tracing::debug!(recipe = %normalized, item = %item_url, "Resolved item");
        Some(item_url)
    }
}
