use serde::Deserialize;

/// Configuration for the video blob store.
///
/// # Example
///
/// ```toml
/// [blobs]
/// backend = "disk"
/// path = "/var/lib/emogo/videos"
/// max_upload_bytes = 20971520
/// ```
#[derive(Debug, Deserialize)]
pub struct BlobsConfig {
    /// Storage strategy: `"managed"` (next to the records), `"disk"`, or
    /// `"passthrough"` (no uploads; only external URLs resolve).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Root directory for the `"disk"` backend.
    #[serde(default = "default_path")]
    pub path: String,

    /// Largest accepted upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_path(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_backend() -> String {
    "managed".to_owned()
}

fn default_path() -> String {
    "uploads".to_owned()
}

fn default_max_upload_bytes() -> u64 {
    emogo_blob::DEFAULT_MAX_BLOB_BYTES
}
