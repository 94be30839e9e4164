use async_trait::async_trait;
use serde_json::{Map, Value};

use emogo_core::Collection;

use crate::document::Document;
use crate::error::RecordError;

/// Trait for persisting JSON documents in named collections.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// Listing returns documents in insertion order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name used in logs (e.g. `"memory"`, `"postgres"`).
    fn backend_name(&self) -> &'static str;

    /// Insert a document, assigning it a fresh identifier.
    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RecordError>;

    /// List up to `limit` documents of a collection in insertion order.
    async fn list(&self, collection: Collection, limit: usize)
    -> Result<Vec<Document>, RecordError>;

    /// Fetch a single document by id. Returns `None` if not found.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, RecordError>;

    /// Release connections held by the backend.
    ///
    /// Called once at shutdown. The default implementation does nothing.
    async fn close(&self) {}
}
