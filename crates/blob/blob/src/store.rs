use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;
use crate::types::{BlobMetadata, ResolvedBlob};

/// Pluggable blob storage backend for uploaded videos.
///
/// Implementors provide the storage mechanism (in-memory, database table,
/// local directory). Blobs are immutable once written; the trait has no
/// update or delete.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name used in logs (e.g. `"memory"`, `"disk"`).
    fn backend_name(&self) -> &'static str;

    /// Largest payload, in bytes, that [`put`](Self::put) accepts.
    fn max_blob_bytes(&self) -> u64;

    /// Store a blob and return its metadata.
    ///
    /// The store assigns a unique key derived from `owner` and the write
    /// time. Payloads above [`max_blob_bytes`](Self::max_blob_bytes) fail
    /// with [`BlobError::TooLarge`] and nothing is written.
    async fn put(
        &self,
        owner: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<BlobMetadata, BlobError>;

    /// Retrieve a blob by key, returning both metadata and content.
    ///
    /// Fails with [`BlobError::NotFound`] if no payload exists for `key`.
    async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError>;

    /// Probe whether a payload exists for `key`.
    ///
    /// Malformed keys yield `Ok(false)`; only backend faults are errors.
    async fn exists(&self, key: &str) -> Result<bool, BlobError>;
}
