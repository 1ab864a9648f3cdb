//! Integration tests for the repositories over the in-memory store.

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use craftbook_core::character::CharacterDocument;
use craftbook_core::cleanup::Lifetime;
use craftbook_core::craft::CraftRecord;
use craftbook_core::identifier::ResourceKind;
use craftbook_db::keys::character_key;
use craftbook_db::repositories::{CharacterRepo, CommunityRepo, XrefRepo};
use craftbook_db::{KeyValueStore, MemoryStore, StoreError};

fn document(share_id: &str) -> CharacterDocument {
    CharacterDocument {
        share_id: share_id.into(),
        name: "Thrall".into(),
        server: "Sulfuron".into(),
        level: None,
        faction: Some("horde".into()),
        class: None,
        public: false,
        professions: BTreeMap::new(),
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn create_refuses_taken_share_id() {
    let store = MemoryStore::new();
    assert!(CharacterRepo::create_if_absent(&store, &document("x"), None).await.unwrap());

    let mut other = document("x");
    other.name = "Jaina".into();
    assert!(!CharacterRepo::create_if_absent(&store, &other, None).await.unwrap());

    let found = CharacterRepo::find(&store, "x").await.unwrap().unwrap();
    assert_eq!(found.name, "Thrall");
}

#[tokio::test]
async fn update_requires_existing_character() {
    let store = MemoryStore::new();
    assert!(!CharacterRepo::update(&store, &document("x")).await.unwrap());
    assert!(CharacterRepo::find(&store, "x").await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_document_is_an_error_not_a_miss() {
    let store = MemoryStore::new();
    store.set(&character_key("bad"), "[1,2", None).await.unwrap();

    let err = CharacterRepo::find(&store, "bad").await.unwrap_err();
    assert_matches!(err, StoreError::Corrupt { ref key, .. } if key == "character:bad");
}

#[tokio::test]
async fn legacy_document_spellings_are_normalized() {
    let store = MemoryStore::new();
    store
        .set(
            &character_key("legacy"),
            r#"{"shareid":"legacy","name":"Thrall","realm":"Sulfuron","isPublic":true,
                "professions":{"Alchemy":[{"name":"Flask","recipeURL":"https://www.wowhead.com/classic/fr/recipe=77","recipeId":5}]}}"#,
            None,
        )
        .await
        .unwrap();

    let doc = CharacterRepo::find(&store, "legacy").await.unwrap().unwrap();
    assert_eq!(doc.server, "Sulfuron");
    assert!(doc.public);
    assert_eq!(doc.professions["Alchemy"][0].recipe_id(), Some(77));
}

#[tokio::test]
async fn document_with_duplicate_spellings_is_readable() {
    let store = MemoryStore::new();
    store
        .set(
            &character_key("k3y"),
            r#"{"id":"k3y","shareId":"k3y","name":"Jaina","server":"Amnennar","public":true,"isPublic":true,
                "professions":{"Tailoring":[{"name":"Bolt","recipeUrl":"","recipeurl":"https://site/ed/fr/recipe=1"}]}}"#,
            None,
        )
        .await
        .unwrap();

    let doc = CharacterRepo::find(&store, "k3y").await.unwrap().unwrap();
    assert_eq!(doc.share_id, "k3y");
    assert_eq!(doc.professions["Tailoring"][0].recipe_id(), Some(1));

    let listing = CharacterRepo::list_all(&store).await.unwrap();
    assert!(listing.skipped.is_empty());
    assert_eq!(listing.characters.len(), 1);
}

#[tokio::test]
async fn document_without_share_id_takes_it_from_its_key() {
    let store = MemoryStore::new();
    store
        .set(&character_key("old1"), r#"{"name":"Thrall","server":"Sulfuron"}"#, None)
        .await
        .unwrap();

    let doc = CharacterRepo::find(&store, "old1").await.unwrap().unwrap();
    assert_eq!(doc.share_id, "old1");
}

#[tokio::test]
async fn list_all_reports_lifetimes_and_skips() {
    let store = MemoryStore::new();
    CharacterRepo::create_if_absent(&store, &document("perm"), None).await.unwrap();
    CharacterRepo::create_if_absent(&store, &document("temp"), Some(500)).await.unwrap();
    store.set(&character_key("junk"), "nope", None).await.unwrap();

    let listing = CharacterRepo::list_all(&store).await.unwrap();

    assert_eq!(listing.skipped, vec![character_key("junk")]);
    assert_eq!(listing.characters.len(), 2);
    let perm = listing
        .characters
        .iter()
        .find(|c| c.document.share_id == "perm")
        .unwrap();
    assert_eq!(perm.lifetime, Lifetime::Permanent);
}

#[tokio::test]
async fn community_append_skips_duplicates() {
    let store = MemoryStore::new();
    assert!(CommunityRepo::get(&store, None).await.unwrap().is_empty());

    let potion = CraftRecord::new("Potion");
    let (added, list) = CommunityRepo::append(&store, None, vec![potion.clone(), potion.clone()])
        .await
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(list.len(), 1);

    let (added, _) = CommunityRepo::append(&store, None, vec![potion]).await.unwrap();
    assert_eq!(added, 0);
    assert_eq!(store.ttl("community:crafts").await.unwrap(), Lifetime::Permanent);
}

#[tokio::test]
async fn xref_cache_entries_expire() {
    let store = MemoryStore::new();
    XrefRepo::put(&store, ResourceKind::Item, 111, 222, 60).await.unwrap();

    assert_eq!(XrefRepo::get(&store, ResourceKind::Item, 111).await.unwrap(), Some(222));
    assert_eq!(XrefRepo::get(&store, ResourceKind::Recipe, 111).await.unwrap(), None);
    assert_eq!(store.get("xref:item:111").await.unwrap().as_deref(), Some("222"));
    assert_matches!(store.ttl("xref:item:111").await.unwrap(), Lifetime::Remaining(_));
}

#[tokio::test]
async fn xref_entry_stored_as_url_is_read_as_id() {
    let store = MemoryStore::new();
    store
        .set("xref:item:111", "https://site/ed/fr/recipe=222", Some(60))
        .await
        .unwrap();
    store.set("xref:recipe:5", "garbage", Some(60)).await.unwrap();

    assert_eq!(XrefRepo::get(&store, ResourceKind::Item, 111).await.unwrap(), Some(222));
    assert_eq!(XrefRepo::get(&store, ResourceKind::Recipe, 5).await.unwrap(), None);
}
