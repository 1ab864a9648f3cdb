//! Integration tests for enrichment and lookup endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_character, get, post_json, test_store, ITEM, RECIPE,
};
use craftbook_db::KeyValueStore;
use serde_json::json;

async fn character_with_item(store: &craftbook_db::StoreHandle) -> String {
    create_character(
        store,
        json!({
            "name": "Thrall",
            "server": "Sulfuron",
            "professions": {
                "Tailoring": [
                    { "name": "Bag", "itemUrl": ITEM },
                    { "name": "Mystery" }
                ]
            }
        }),
    )
    .await
}

#[tokio::test]
async fn character_enrichment_persists() {
    let store = test_store();
    let share_id = character_with_item(&store).await;

    let response = post_json(
        build_test_app(store.clone()),
        &format!("/api/v1/characters/{share_id}/enrich"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 1);
    assert_eq!(json["data"]["persisted"], true);

    let stored = body_json(
        get(
            build_test_app(store),
            &format!("/api/v1/characters/{share_id}"),
        )
        .await,
    )
    .await;
    let bag = &stored["data"]["professions"]["Tailoring"][0];
    assert_eq!(bag["recipeUrl"], RECIPE);
    assert_eq!(bag["recipeId"], 222);
    assert!(stored["data"]["professions"]["Tailoring"][1]
        .get("recipeUrl")
        .is_none());
}

#[tokio::test]
async fn dry_run_does_not_persist() {
    let store = test_store();
    let share_id = character_with_item(&store).await;
    let key = format!("character:{share_id}");
    let before = store.get(&key).await.unwrap();

    let response = post_json(
        build_test_app(store.clone()),
        &format!("/api/v1/characters/{share_id}/enrich?dry_run=true"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dryRun"], true);
    assert_eq!(json["data"]["persisted"], false);
    assert_eq!(
        json["data"]["character"]["professions"]["Tailoring"][0]["recipeUrl"],
        RECIPE
    );

    assert_eq!(store.get(&key).await.unwrap(), before);
}

#[tokio::test]
async fn enriching_missing_character_is_404() {
    let response = post_json(
        build_test_app(test_store()),
        "/api/v1/characters/ghost/enrich",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stateless_batch_never_touches_store() {
    let store = test_store();
    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/enrich",
        json!({ "records": [{ "name": "Bag", "itemUrl": ITEM }, { "name": "Flask", "recipeUrl": RECIPE }] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 2);
    assert_eq!(json["data"]["records"][0]["recipeId"], 222);
    assert_eq!(json["data"]["records"][1]["itemUrl"], ITEM);

    let (_, keys) = store.scan(0, "*", 100).await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn community_list_append_and_enrich() {
    let store = test_store();

    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/community/crafts?suffix=horde",
        json!({ "crafts": [{ "name": "Flask", "recipeUrl": RECIPE }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["added"], 1);

    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/community/crafts/enrich?suffix=horde",
        json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["updated"], 1);

    let json = body_json(
        get(
            build_test_app(store.clone()),
            "/api/v1/community/crafts?suffix=horde",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"][0]["itemUrl"], ITEM);

    // Other lists are independent.
    let json = body_json(get(build_test_app(store), "/api/v1/community/crafts").await).await;
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn invalid_suffix_is_400() {
    let response = get(
        build_test_app(test_store()),
        "/api/v1/community/crafts?suffix=a:b",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lookup_returns_counterpart_and_metadata() {
    let response = get(
        build_test_app(test_store()),
        "/api/v1/lookup?url=https://www.wowhead.com/item=111",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "item");
    assert_eq!(json["data"]["id"], 111);
    assert_eq!(json["data"]["url"], ITEM);
    assert_eq!(json["data"]["recipeUrl"], RECIPE);
    assert_eq!(json["data"]["name"], "Sac en lin");
}

#[tokio::test]
async fn lookup_of_unrelated_url_is_400() {
    let response = get(
        build_test_app(test_store()),
        "/api/v1/lookup?url=https://example.com/",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
