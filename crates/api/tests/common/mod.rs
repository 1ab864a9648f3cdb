//! Shared helpers for API integration tests.
//!
//! Every test app runs against a fresh in-memory store and a table-driven
//! resolver, so no Redis or network access is needed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use craftbook_api::config::ServerConfig;
use craftbook_api::router::build_app_router;
use craftbook_api::state::AppState;
use craftbook_core::cleanup::PermanentTieBreak;
use craftbook_core::enrichment::CrossReferenceResolver;
use craftbook_db::{MemoryStore, StoreHandle};
use craftbook_wowhead::{DisplayMetadata, DisplayMetadataSource, WowheadConfig};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const CONFIRM_CODE: &str = "SUPPRIMER";
pub const ITEM: &str = "https://www.wowhead.com/classic/fr/item=111";
pub const RECIPE: &str = "https://www.wowhead.com/classic/fr/recipe=222";

/// Resolver linking [`ITEM`] and [`RECIPE`] and nothing else.
#[derive(Default)]
pub struct TableResolver {
    recipes: HashMap<String, String>,
    items: HashMap<String, String>,
}

impl TableResolver {
    pub fn linked() -> Self {
        let mut r = Self::default();
        r.recipes.insert(ITEM.into(), RECIPE.into());
        r.items.insert(RECIPE.into(), ITEM.into());
        r
    }
}

#[async_trait]
impl CrossReferenceResolver for TableResolver {
    async fn resolve_recipe_from_url(&self, url: &str) -> String {
        self.recipes.get(url).cloned().unwrap_or_else(|| url.to_string())
    }

    async fn resolve_item_from_recipe_url(&self, recipe_url: &str) -> Option<String> {
        self.items.get(recipe_url).cloned()
    }
}

/// Metadata source naming every resource "Sac en lin".
pub struct FixedMetadata;

#[async_trait]
impl DisplayMetadataSource for FixedMetadata {
    async fn display_metadata(&self, _url: &str) -> DisplayMetadata {
        DisplayMetadata {
            name: Some("Sac en lin".into()),
            icon: Some("inv_misc_bag_10".into()),
        }
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        redis_url: "memory://".to_string(),
        character_ttl_secs: 3600,
        admin_confirm_code: CONFIRM_CODE.to_string(),
        enrich_concurrency: 4,
        cleanup_tie_break: PermanentTieBreak::default(),
        xref_cache_ttl_secs: 60,
        wowhead: WowheadConfig::default(),
    }
}

/// A fresh in-memory store.
pub fn test_store() -> StoreHandle {
    Arc::new(MemoryStore::new())
}

/// Build the full application router over `store`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: StoreHandle) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        resolver: Arc::new(TableResolver::linked()),
        metadata: Arc::new(FixedMetadata),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a character through the API and return its share id.
pub async fn create_character(store: &StoreHandle, body: serde_json::Value) -> String {
    let response = post_json(build_test_app(store.clone()), "/api/v1/characters", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["shareId"].as_str().unwrap().to_string()
}
