//! Single-URL lookup: cross-reference plus display metadata.

use async_trait::async_trait;
use craftbook_core::enrichment::CrossReferenceResolver;
use craftbook_core::identifier::{normalize_url, parse_resource, ResourceKind, UrlDefaults};
use serde::Serialize;

use crate::api::PageFetcher;
use crate::resolver::WowheadResolver;
use crate::scrape::{scrape_icon, scrape_name};

/// Name and icon of a Wowhead resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Best-effort source of [`DisplayMetadata`]. Never fails; unknown fields
/// stay `None`.
#[async_trait]
pub trait DisplayMetadataSource: Send + Sync {
    async fn display_metadata(&self, url: &str) -> DisplayMetadata;
}

#[async_trait]
impl<F: PageFetcher> DisplayMetadataSource for WowheadResolver<F> {
    async fn display_metadata(&self, url: &str) -> DisplayMetadata {
        let Some(resource) = parse_resource(url) else {
            return DisplayMetadata::default();
        };

        let mut metadata = match self
            .fetcher()
            .fetch_tooltip(resource.kind, resource.id, &self.defaults().locale)
            .await
        {
            Ok(tooltip) => DisplayMetadata {
                name: tooltip.name.filter(|n| !n.is_empty()),
                icon: tooltip.icon.filter(|i| !i.is_empty()),
            },
            Err(e) => {
                tracing::debug!(url, error = %e, "Tooltip lookup failed");
                DisplayMetadata::default()
            }
        };

        if metadata.name.is_none() || metadata.icon.is_none() {
            match self.fetcher().fetch_page(url).await {
                Ok(page) => {
                    metadata.name = metadata.name.or_else(|| scrape_name(&page.body));
                    metadata.icon = metadata.icon.or_else(|| scrape_icon(&page.body));
                }
                Err(e) => tracing::debug!(url, error = %e, "Page lookup failed"),
            }
        }
        metadata
    }
}

/// Everything known about one Wowhead URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub kind: ResourceKind,
    pub id: u64,
    /// The normalized input URL.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_url: Option<String>,
    #[serde(flatten)]
    pub display: DisplayMetadata,
}

/// Resolve the counterpart of `url` and its display metadata.
///
/// Returns `None` when `url` names no recipe or item.
pub async fn lookup(
    resolver: &dyn CrossReferenceResolver,
    metadata: &dyn DisplayMetadataSource,
    defaults: &UrlDefaults,
    url: &str,
) -> Option<LookupResult> {
    let normalized = normalize_url(url, defaults);
    let resource = parse_resource(&normalized)?;

    let (recipe_url, item_url) = match resource.kind {
        ResourceKind::Recipe => {
            let item = resolver.resolve_item_from_recipe_url(&normalized).await;
            (Some(normalized.clone()), item)
        }
        ResourceKind::Item => {
            let resolved = resolver.resolve_recipe_from_url(&normalized).await;
            let recipe = (resolved != normalized
                && parse_resource(&resolved).map(|r| r.kind) == Some(ResourceKind::Recipe))
            .then_some(resolved);
            (recipe, Some(normalized.clone()))
        }
    };

    let display = metadata.display_metadata(&normalized).await;

    Some(LookupResult {
        kind: resource.kind,
        id: resource.id,
        url: normalized,
        recipe_url,
        item_url,
        display,
    })
}
