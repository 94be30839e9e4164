use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;

use emogo_blob::{
    BlobError, BlobMetadata, BlobStore, DEFAULT_MAX_BLOB_BYTES, ResolvedBlob, generate_key,
    is_valid_key,
};

/// In-memory [`BlobStore`] backed by a [`DashMap`].
///
/// This is the managed backend used alongside the in-memory record store:
/// blobs live next to the records, in the same process. Suitable for
/// development and testing.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, (BlobMetadata, Bytes)>,
    max_blob_bytes: u64,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    /// Create a new, empty store with the default 10 MiB upload limit.
    pub fn new() -> Self {
        Self::with_max_blob_bytes(DEFAULT_MAX_BLOB_BYTES)
    }

    /// Create a new, empty store with a custom upload limit.
    pub fn with_max_blob_bytes(max_blob_bytes: u64) -> Self {
        Self {
            blobs: DashMap::new(),
            max_blob_bytes,
        }
    }

    /// Drop a blob behind the service's back. Returns `true` if it existed.
    ///
    /// The service never deletes blobs; this exists so tests and admin
    /// tooling can reproduce storage drift.
    pub fn remove(&self, key: &str) -> bool {
        self.blobs.remove(key).is_some()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Returns `true` if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn max_blob_bytes(&self) -> u64 {
        self.max_blob_bytes
    }

    async fn put(
        &self,
        owner: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<BlobMetadata, BlobError> {
        BlobError::check_size(data.len() as u64, self.max_blob_bytes)?;

        let now = Utc::now();
        let key = generate_key(owner, now);
        let meta = BlobMetadata::describe(key.clone(), owner, filename, content_type, &data, now);

        self.blobs.insert(key, (meta.clone(), data));
        Ok(meta)
    }

    async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
        let entry = self
            .blobs
            .get(key)
            .ok_or_else(|| BlobError::NotFound(key.to_owned()))?;
        let (metadata, data) = entry.value();
        Ok(ResolvedBlob {
            metadata: metadata.clone(),
            data: data.clone(),
        })
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        Ok(is_valid_key(key) && self.blobs.contains_key(key))
    }
}
