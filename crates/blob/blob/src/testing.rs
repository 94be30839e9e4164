use bytes::Bytes;

use crate::error::BlobError;
use crate::store::BlobStore;

fn payload(len: usize) -> Bytes {
    Bytes::from((0..len).map(|i| (i % 251) as u8).collect::<Vec<u8>>())
}

/// Run the full blob store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
/// The store must accept uploads (passthrough stores do not qualify).
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_blob_conformance_tests(store: &dyn BlobStore) -> Result<(), BlobError> {
    test_put_and_get(store).await?;
    test_exists_after_put(store).await?;
    test_get_missing(store).await?;
    test_exists_malformed(store).await?;
    test_keys_unique(store).await?;
    test_too_large(store).await?;
    Ok(())
}

async fn test_put_and_get(store: &dyn BlobStore) -> Result<(), BlobError> {
    let data = payload(1024);
    let meta = store
        .put("u1", "clip.mp4", "video/mp4", data.clone())
        .await?;
    assert!(!meta.key.is_empty(), "put should assign a key");
    assert_eq!(meta.size_bytes, 1024);
    assert_eq!(meta.owner, "u1");
    assert_eq!(meta.content_type, "video/mp4");
    assert_eq!(meta.filename, "clip.mp4");

    let blob = store.get(&meta.key).await?;
    assert_eq!(blob.data, data, "get should return the stored bytes");
    assert_eq!(blob.metadata, meta, "get should return the stored metadata");
    Ok(())
}

async fn test_exists_after_put(store: &dyn BlobStore) -> Result<(), BlobError> {
    let meta = store
        .put("u2", "a.mov", "video/quicktime", payload(16))
        .await?;
    assert!(store.exists(&meta.key).await?, "stored key should exist");
    Ok(())
}

async fn test_get_missing(store: &dyn BlobStore) -> Result<(), BlobError> {
    assert!(!store.exists("missing_20000101T000000000000_deadbeef").await?);
    match store.get("missing_20000101T000000000000_deadbeef").await {
        Err(BlobError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
        Ok(_) => panic!("get on missing key should fail with NotFound"),
    }
}

async fn test_exists_malformed(store: &dyn BlobStore) -> Result<(), BlobError> {
    for key in ["", "../etc/passwd", "a/b", "with space", ".hidden"] {
        assert!(
            !store.exists(key).await?,
            "malformed key {key:?} should not exist"
        );
    }
    Ok(())
}

async fn test_keys_unique(store: &dyn BlobStore) -> Result<(), BlobError> {
    let a = store
        .put("u3", "x.mp4", "video/mp4", payload(8))
        .await?;
    let b = store
        .put("u3", "x.mp4", "video/mp4", payload(8))
        .await?;
    assert_ne!(a.key, b.key, "back-to-back uploads should get distinct keys");
    Ok(())
}

async fn test_too_large(store: &dyn BlobStore) -> Result<(), BlobError> {
    let limit = store.max_blob_bytes();
    let oversized = usize::try_from(limit + 1).expect("limit fits in memory");
    match store
        .put("u4", "big.mp4", "video/mp4", payload(oversized))
        .await
    {
        Err(BlobError::TooLarge { size, limit: l }) => {
            assert_eq!(size, limit + 1);
            assert_eq!(l, limit);
            Ok(())
        }
        Err(e) => Err(e),
        Ok(_) => panic!("put above the limit should fail with TooLarge"),
    }
}
