use std::sync::Arc;

use craftbook_core::enrichment::CrossReferenceResolver;
use craftbook_db::StoreHandle;
use craftbook_wowhead::DisplayMetadataSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Process-wide key-value store client.
    pub store: StoreHandle,
    pub config: Arc<ServerConfig>,
    /// Recipe/item cross-reference resolver used by enrichment.
    pub resolver: Arc<dyn CrossReferenceResolver>,
    /// Display name/icon source for `/lookup`.
    pub metadata: Arc<dyn DisplayMetadataSource>,
}
