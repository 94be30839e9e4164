use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use emogo_blob::{
    BlobError, BlobMetadata, BlobStore, DEFAULT_MAX_BLOB_BYTES, ResolvedBlob, generate_key,
    is_valid_key,
};

const META_SUFFIX: &str = ".meta.json";
const PART_SUFFIX: &str = ".part";

/// [`BlobStore`] that keeps each blob as a file in a local directory.
///
/// Layout: the payload lives at `<root>/<key>` and its metadata at
/// `<root>/<key>.meta.json`. Files dropped into the directory without a
/// sidecar (uploads from before metadata was recorded) are still served,
/// with metadata inferred from the file itself.
#[derive(Debug, Clone)]
pub struct LocalDiskBlobStore {
    root: PathBuf,
    max_blob_bytes: u64,
}

fn storage_err(e: &io::Error) -> BlobError {
    BlobError::Storage(e.to_string())
}

/// Best-effort content type for files that arrived without metadata.
fn guess_content_type(key: &str) -> &'static str {
    let ext = Path::new(key)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("3gp") => "video/3gpp",
        _ => "application/octet-stream",
    }
}

/// The files making up one blob while it is being written.
///
/// The payload only appears under its key once fully written, so a reader
/// never sees a half-written file.
struct PendingBlob {
    part: PathBuf,
    sidecar: PathBuf,
    payload: PathBuf,
}

impl PendingBlob {
    /// Write everything, or leave nothing behind.
    async fn commit(&self, data: &[u8], sidecar: &[u8]) -> Result<(), BlobError> {
        if let Err(e) = self.write(data, sidecar).await {
            self.discard().await;
            return Err(storage_err(&e));
        }
        Ok(())
    }

    async fn write(&self, data: &[u8], sidecar: &[u8]) -> io::Result<()> {
        tokio::fs::write(&self.part, data).await?;
        tokio::fs::write(&self.sidecar, sidecar).await?;
        tokio::fs::rename(&self.part, &self.payload).await
    }

    async fn discard(&self) {
        for path in [&self.part, &self.sidecar] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "leftover partial blob file"),
            }
        }
    }
}

impl LocalDiskBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        Self::with_max_blob_bytes(root, DEFAULT_MAX_BLOB_BYTES).await
    }

    /// Open a store rooted at `root` with a custom upload limit.
    pub async fn with_max_blob_bytes(
        root: impl Into<PathBuf>,
        max_blob_bytes: u64,
    ) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| storage_err(&e))?;
        Ok(Self {
            root,
            max_blob_bytes,
        })
    }

    /// Directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` to its payload path, or `None` if the key cannot name a
    /// payload in this store.
    fn payload_path(&self, key: &str) -> Option<PathBuf> {
        if !is_valid_key(key) || key.ends_with(META_SUFFIX) || key.ends_with(PART_SUFFIX) {
            return None;
        }
        Some(self.root.join(key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{META_SUFFIX}"))
    }

    async fn read_metadata(&self, key: &str, payload: &Path) -> Result<BlobMetadata, BlobError> {
        match tokio::fs::read(self.meta_path(key)).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| BlobError::Storage(format!("corrupt metadata for {key}: {e}"))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(key, "no metadata sidecar, inferring from file");
                let stat = tokio::fs::metadata(payload)
                    .await
                    .map_err(|e| storage_err(&e))?;
                let created_at = stat
                    .modified()
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                Ok(BlobMetadata {
                    key: key.to_owned(),
                    filename: key.to_owned(),
                    content_type: guess_content_type(key).to_owned(),
                    size_bytes: stat.len(),
                    checksum_sha256: String::new(),
                    owner: String::new(),
                    created_at,
                })
            }
            Err(e) => Err(storage_err(&e)),
        }
    }
}

#[async_trait]
impl BlobStore for LocalDiskBlobStore {
    fn backend_name(&self) -> &'static str {
        "disk"
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
        let payload = self
            .payload_path(&key)
            .ok_or_else(|| BlobError::InvalidKey(key.clone()))?;

        let sidecar = serde_json::to_vec(&meta)
            .map_err(|e| BlobError::Storage(format!("metadata encoding: {e}")))?;
        PendingBlob {
            part: self.root.join(format!("{key}{PART_SUFFIX}")),
            sidecar: self.meta_path(&key),
            payload,
        }
        .commit(&data, &sidecar)
        .await?;

        debug!(key = %meta.key, size = meta.size_bytes, "blob written to disk");
        Ok(meta)
    }

    async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
        let payload = self
            .payload_path(key)
            .ok_or_else(|| BlobError::NotFound(key.to_owned()))?;

        let data = match tokio::fs::read(&payload).await {
            Ok(data) => Bytes::from(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BlobError::NotFound(key.to_owned()));
            }
            Err(e) => return Err(storage_err(&e)),
        };
        let metadata = self.read_metadata(key, &payload).await?;

        Ok(ResolvedBlob { metadata, data })
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        let Some(payload) = self.payload_path(key) else {
            return Ok(false);
        };
        match tokio::fs::metadata(&payload).await {
            Ok(stat) => Ok(stat.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_err(&e)),
        }
    }
}
