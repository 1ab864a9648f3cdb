//! Redirect-following against a local HTTP server standing in for Wowhead.

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use craftbook_core::craft::CraftRecord;
use craftbook_core::enrichment::{enrich_records, CrossReferenceResolver};
use craftbook_core::identifier::UrlDefaults;
use craftbook_wowhead::{WowheadApi, WowheadConfig, WowheadResolver};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fake_wowhead(uri: Uri) -> Response {
    match uri.path() {
        "/ed/fr/item=111" => Redirect::temporary("/ed/fr/recipe=222").into_response(),
        "/ed/fr/recipe=222" => Html(r#"<a href="/ed/fr/item=111">Bag</a>"#).into_response(),
        "/ed/fr/item=333" => {
            Html(r#"<div>Taught by <a href="/ed/fr/recipe=444">Pattern</a></div>"#)
                .into_response()
        }
        "/ed/fr/item=555" => Redirect::temporary("/ed/fr/item=555").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the fake site on an ephemeral port; returns its base URL.
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(fake_wowhead);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn resolver(base: &str) -> WowheadResolver<WowheadApi> {
    let host = base.trim_start_matches("http://").to_string();
    let config = WowheadConfig {
        defaults: UrlDefaults {
            host,
            edition: "ed".into(),
            locale: "fr".into(),
        },
        tooltip_base: format!("{base}/tooltip"),
        max_redirects: 3,
        timeout_secs: 5,
        ..WowheadConfig::default()
    };
    let api = WowheadApi::new(&config).unwrap();
    WowheadResolver::new(api, config.defaults)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn item_redirected_to_recipe_is_enriched() {
    let base = spawn_server().await;
    let r = resolver(&base);
    let record = CraftRecord::new("Bag").with_item_url(format!("{base}/ed/fr/item=111"));

    let outcome = enrich_records(&r, vec![record], false, 1).await;

    let record = &outcome.records[0];
    assert_eq!(outcome.updated, 1);
    assert!(record.recipe_url().unwrap().ends_with("/recipe=222"));
    assert_eq!(record.recipe_id(), Some(222));
}

#[tokio::test]
async fn recipe_found_in_body_without_redirect() {
    let base = spawn_server().await;
    let r = resolver(&base);

    let out = r
        .resolve_recipe_from_url(&format!("{base}/ed/fr/item=333"))
        .await;
    assert!(out.ends_with("/ed/fr/recipe=444"), "{out}");
}

#[tokio::test]
async fn missing_page_returns_input() {
    let base = spawn_server().await;
    let r = resolver(&base);
    let url = format!("{base}/ed/fr/item=999");

    assert_eq!(r.resolve_recipe_from_url(&url).await, url);
}

#[tokio::test]
async fn redirect_loop_is_cut_off() {
    let base = spawn_server().await;
    let r = resolver(&base);
    let url = format!("{base}/ed/fr/item=555");

    assert_eq!(r.resolve_recipe_from_url(&url).await, url);
}

#[tokio::test]
async fn item_read_from_recipe_page() {
    let base = spawn_server().await;
    let r = resolver(&base);

    let item = r
        .resolve_item_from_recipe_url(&format!("{base}/ed/fr/recipe=222"))
        .await;
    assert!(item.unwrap().ends_with("/ed/fr/item=111"));
}
