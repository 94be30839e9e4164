use serde_json::{Map, Value, json};

use emogo_core::Collection;

use crate::error::RecordError;
use crate::store::RecordStore;

fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Run the full record store conformance test suite.
///
/// Call this from your backend's test module with a fresh, empty store.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn RecordStore) -> Result<(), RecordError> {
    test_list_empty(store).await?;
    test_insert_assigns_distinct_ids(store).await?;
    test_list_insertion_order(store).await?;
    test_list_limit(store).await?;
    test_collections_isolated(store).await?;
    test_get(store).await?;
    test_client_id_ignored(store).await?;
    Ok(())
}

async fn test_list_empty(store: &dyn RecordStore) -> Result<(), RecordError> {
    let docs = store.list(Collection::Vlogs, 100).await?;
    assert!(docs.is_empty(), "fresh store should have no vlogs");
    Ok(())
}

async fn test_insert_assigns_distinct_ids(store: &dyn RecordStore) -> Result<(), RecordError> {
    let a = store
        .insert(Collection::Sentiments, body(json!({"user_id": "u1", "emotion_score": 3})))
        .await?;
    let b = store
        .insert(Collection::Sentiments, body(json!({"user_id": "u1", "emotion_score": 3})))
        .await?;
    assert!(!a.id.is_empty(), "insert should assign an id");
    assert_ne!(a.id, b.id, "ids should be distinct");
    assert_eq!(a.body["emotion_score"], json!(3));
    Ok(())
}

async fn test_list_insertion_order(store: &dyn RecordStore) -> Result<(), RecordError> {
    let mut inserted = Vec::new();
    for i in 0..5 {
        let doc = store
            .insert(Collection::Gps, body(json!({"user_id": "u1", "seq": i})))
            .await?;
        inserted.push(doc.id);
    }
    let listed: Vec<String> = store
        .list(Collection::Gps, 100)
        .await?
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(listed, inserted, "list should follow insertion order");
    Ok(())
}

async fn test_list_limit(store: &dyn RecordStore) -> Result<(), RecordError> {
    let docs = store.list(Collection::Gps, 2).await?;
    assert_eq!(docs.len(), 2, "list should honor the limit");
    assert_eq!(docs[0].body["seq"], json!(0));
    assert_eq!(docs[1].body["seq"], json!(1));
    Ok(())
}

async fn test_collections_isolated(store: &dyn RecordStore) -> Result<(), RecordError> {
    let vlogs = store.list(Collection::Vlogs, 100).await?;
    assert!(vlogs.is_empty(), "inserts elsewhere should not leak into vlogs");
    Ok(())
}

async fn test_get(store: &dyn RecordStore) -> Result<(), RecordError> {
    let doc = store
        .insert(
            Collection::Vlogs,
            body(json!({"user_id": "u9", "location": {"lat": 1.5, "tags": ["a"]}})),
        )
        .await?;
    let fetched = store.get(Collection::Vlogs, &doc.id).await?;
    assert_eq!(fetched.as_ref(), Some(&doc), "get should return the stored doc");

    let wrong_collection = store.get(Collection::Gps, &doc.id).await?;
    assert!(wrong_collection.is_none(), "get is scoped to the collection");

    let missing = store.get(Collection::Vlogs, "no-such-id").await?;
    assert!(missing.is_none());
    Ok(())
}

async fn test_client_id_ignored(store: &dyn RecordStore) -> Result<(), RecordError> {
    let doc = store
        .insert(
            Collection::Sentiments,
            body(json!({"_id": "spoofed", "user_id": "u2", "emotion_score": 1})),
        )
        .await?;
    assert_ne!(doc.id, "spoofed");
    assert!(!doc.body.contains_key("_id"));
    Ok(())
}
