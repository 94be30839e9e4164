use std::sync::Arc;

use emogo_blob::{BlobStore, DEFAULT_MAX_BLOB_BYTES};
use emogo_records::RecordStore;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::metrics::GatewayMetrics;

/// Page size applied to listings unless configured otherwise.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Base URL used to build video references unless configured otherwise.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";

/// Fluent builder for constructing a [`Gateway`] instance.
///
/// A [`RecordStore`] and a [`BlobStore`] must be supplied. The remaining
/// settings default to a 1000-record page, a 10 MiB upload limit, and a
/// localhost base URL.
pub struct GatewayBuilder {
    records: Option<Arc<dyn RecordStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    public_base_url: String,
    list_limit: usize,
    max_upload_bytes: u64,
}

impl GatewayBuilder {
    /// Create a new builder with all optional fields set to their defaults.
    pub fn new() -> Self {
        Self {
            records: None,
            blobs: None,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_owned(),
            list_limit: DEFAULT_LIST_LIMIT,
            max_upload_bytes: DEFAULT_MAX_BLOB_BYTES,
        }
    }

    /// Set the record store implementation.
    #[must_use]
    pub fn records(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.records = Some(store);
        self
    }

    /// Set the blob store implementation.
    #[must_use]
    pub fn blobs(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(store);
        self
    }

    /// Set the externally reachable base URL that video references start with.
    #[must_use]
    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into();
        self
    }

    /// Set the maximum number of records a listing returns.
    #[must_use]
    pub fn list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// Set the largest accepted upload, in bytes.
    #[must_use]
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Consume the builder and produce a configured [`Gateway`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if a store is missing, the
    /// page size is zero, or the base URL is empty.
    pub fn build(self) -> Result<Gateway, GatewayError> {
        let records = self
            .records
            .ok_or_else(|| GatewayError::Configuration("record store is required".into()))?;

        let blobs = self
            .blobs
            .ok_or_else(|| GatewayError::Configuration("blob store is required".into()))?;

        if self.list_limit == 0 {
            return Err(GatewayError::Configuration(
                "list limit must be positive".into(),
            ));
        }

        let public_base_url = self.public_base_url.trim().trim_end_matches('/').to_owned();
        if public_base_url.is_empty() {
            return Err(GatewayError::Configuration(
                "public base URL must not be empty".into(),
            ));
        }

        Ok(Gateway {
            records,
            blobs,
            public_base_url,
            list_limit: self.list_limit,
            max_upload_bytes: self.max_upload_bytes,
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
