use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Upload limit applied when a backend is not configured otherwise (10 MiB).
pub const DEFAULT_MAX_BLOB_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata for a stored blob (an uploaded video).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// Opaque key assigned by the store at write time.
    pub key: String,
    /// Original filename supplied by the uploader.
    pub filename: String,
    /// MIME content type (e.g. `"video/mp4"`).
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// `SHA-256` hex digest of the blob content.
    pub checksum_sha256: String,
    /// User that uploaded the blob.
    pub owner: String,
    /// When the blob was stored.
    pub created_at: DateTime<Utc>,
}

impl BlobMetadata {
    /// Describe `data` about to be stored under `key`, computing its size
    /// and checksum.
    #[must_use]
    pub fn describe(
        key: String,
        owner: &str,
        filename: &str,
        content_type: &str,
        data: &[u8],
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes: data.len() as u64,
            checksum_sha256: hex::encode(Sha256::digest(data)),
            owner: owner.to_owned(),
            created_at,
        }
    }
}

/// A fully resolved blob: metadata plus the binary content.
#[derive(Debug, Clone)]
pub struct ResolvedBlob {
    /// Blob metadata.
    pub metadata: BlobMetadata,
    /// The raw binary content.
    pub data: bytes::Bytes,
}
