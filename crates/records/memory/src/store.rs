use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use emogo_core::Collection;
use emogo_records::{Document, RecordError, RecordStore, new_record_id};

/// In-memory [`RecordStore`] backed by a [`DashMap`] of per-collection
/// vectors.
///
/// Appending to a vector keeps insertion order for free. Suitable for
/// development and testing; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: DashMap<Collection, Vec<Document>>,
}

impl MemoryRecordStore {
    /// Create a new, empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RecordError> {
        let doc = Document::new(new_record_id(), body);
        self.collections
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn list(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<Document>, RecordError> {
        Ok(self
            .collections
            .get(&collection)
            .map(|docs| docs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, RecordError> {
        Ok(self
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use emogo_records::testing::run_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryRecordStore::new();
        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_are_all_kept() {
        let store = Arc::new(MemoryRecordStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut body = Map::new();
                body.insert("seq".into(), Value::from(i));
                store.insert(Collection::Gps, body).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.count(Collection::Gps), 32);
    }
}
