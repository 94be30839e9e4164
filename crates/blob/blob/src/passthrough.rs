use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;
use crate::key::is_absolute_url;
use crate::store::BlobStore;
use crate::types::{BlobMetadata, ResolvedBlob};

/// A [`BlobStore`] that holds no bytes at all.
///
/// Videos are hosted elsewhere and records carry their URL directly, so the
/// only keys this store knows are fully qualified `http(s)` URLs. Uploads are
/// refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlPassthroughBlobStore;

impl UrlPassthroughBlobStore {
    /// Create a new passthrough store.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BlobStore for UrlPassthroughBlobStore {
    fn backend_name(&self) -> &'static str {
        "passthrough"
    }

    fn max_blob_bytes(&self) -> u64 {
        0
    }

    async fn put(
        &self,
        _owner: &str,
        _filename: &str,
        _content_type: &str,
        _data: Bytes,
    ) -> Result<BlobMetadata, BlobError> {
        Err(BlobError::Unsupported(
            "url passthrough storage does not accept uploads".into(),
        ))
    }

    async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
        Err(BlobError::NotFound(key.to_owned()))
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        Ok(is_absolute_url(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn refuses_uploads() {
        let store = UrlPassthroughBlobStore::new();
        let err = store
            .put("u1", "clip.mp4", "video/mp4", Bytes::from_static(b"abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::Unsupported(_)));
    }

    #[tokio::test]
    async fn only_absolute_urls_exist() {
        let store = UrlPassthroughBlobStore::new();
        assert!(store.exists("https://cdn.example.com/a.mp4").await.unwrap());
        assert!(!store.exists("a.mp4").await.unwrap());
        assert!(!store.exists("").await.unwrap());
    }

    #[tokio::test]
    async fn get_is_not_found() {
        let store = UrlPassthroughBlobStore::new();
        let err = store.get("https://cdn.example.com/a.mp4").await.unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));
    }
}
