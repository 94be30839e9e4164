use std::sync::Arc;

use tracing::info;

use emogo_blob::{BlobStore, UrlPassthroughBlobStore};
#[cfg(feature = "postgres")]
use emogo_blob_postgres::{PostgresBlobConfig, PostgresBlobStore};
use emogo_blob_disk::LocalDiskBlobStore;
use emogo_blob_memory::MemoryBlobStore;
use emogo_records::RecordStore;
use emogo_records_memory::MemoryRecordStore;
#[cfg(feature = "postgres")]
use emogo_records_postgres::{PostgresConfig, PostgresRecordStore};

use crate::config::{BlobsConfig, RecordsConfig};
use crate::error::ServerError;

/// A record store and the blob store paired with it.
pub struct Stores {
    pub records: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("records", &self.records.backend_name())
            .field("blobs", &self.blobs.backend_name())
            .finish()
    }
}

/// Construct the record and blob stores from configuration.
///
/// The `"managed"` blob backend lives wherever the records live: in process
/// for the memory backend, in the same database for postgres.
pub async fn create_stores(
    records: &RecordsConfig,
    blobs: &BlobsConfig,
) -> Result<Stores, ServerError> {
    let stores = match records.backend.as_str() {
        "memory" => {
            let blob_store: Arc<dyn BlobStore> = match create_external_blob_store(blobs).await? {
                Some(external) => external,
                None => Arc::new(MemoryBlobStore::with_max_blob_bytes(blobs.max_upload_bytes)),
            };
            Stores {
                records: Arc::new(MemoryRecordStore::new()),
                blobs: blob_store,
            }
        }
        #[cfg(feature = "postgres")]
        "postgres" => create_postgres(records, blobs).await?,
        other => {
            return Err(ServerError::Config(format!(
                "unsupported records backend: {other} (is the feature enabled?)"
            )));
        }
    };

    info!(
        records = stores.records.backend_name(),
        blobs = stores.blobs.backend_name(),
        "stores initialized"
    );
    Ok(stores)
}

/// Build a blob store that does not depend on the record backend.
///
/// Returns `None` for `"managed"`, which the caller builds next to its
/// records.
async fn create_external_blob_store(
    config: &BlobsConfig,
) -> Result<Option<Arc<dyn BlobStore>>, ServerError> {
    match config.backend.as_str() {
        "managed" => Ok(None),
        "disk" => {
            let store =
                LocalDiskBlobStore::with_max_blob_bytes(&config.path, config.max_upload_bytes)
                    .await
                    .map_err(|e| {
                        ServerError::Config(format!("disk blob store at {}: {e}", config.path))
                    })?;
            Ok(Some(Arc::new(store)))
        }
        "passthrough" => Ok(Some(Arc::new(UrlPassthroughBlobStore::new()))),
        other => Err(ServerError::Config(format!(
            "unsupported blobs backend: {other} (expected managed, disk, or passthrough)"
        ))),
    }
}

#[cfg(feature = "postgres")]
fn postgres_config(config: &RecordsConfig) -> Result<PostgresConfig, ServerError> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| ServerError::Config("postgres backend requires 'url' in [records]".into()))?;
    let defaults = PostgresConfig::default();
    Ok(PostgresConfig {
        url: url.to_owned(),
        pool_size: config.pool_size.unwrap_or(defaults.pool_size),
        schema: config.schema.clone().unwrap_or(defaults.schema),
        table_prefix: config.prefix.clone().unwrap_or(defaults.table_prefix),
    })
}

#[cfg(feature = "postgres")]
async fn create_postgres(
    records: &RecordsConfig,
    blobs: &BlobsConfig,
) -> Result<Stores, ServerError> {
    let pg_config = postgres_config(records)?;
    let blob_config = PostgresBlobConfig {
        url: pg_config.url.clone(),
        pool_size: pg_config.pool_size,
        schema: pg_config.schema.clone(),
        table_prefix: pg_config.table_prefix.clone(),
        max_blob_bytes: blobs.max_upload_bytes,
    };

    let store = PostgresRecordStore::new(pg_config)
        .await
        .map_err(|e| ServerError::Config(format!("postgres records: {e}")))?;

    // The managed blob table shares the record store's pool.
    let blob_store: Arc<dyn BlobStore> = match create_external_blob_store(blobs).await? {
        Some(external) => external,
        None => Arc::new(
            PostgresBlobStore::from_pool(store.pool().clone(), blob_config)
                .await
                .map_err(|e| ServerError::Config(format!("postgres blobs: {e}")))?,
        ),
    };

    Ok(Stores {
        records: Arc::new(store),
        blobs: blob_store,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_records_with_managed_blobs() {
        let stores = create_stores(&RecordsConfig::default(), &BlobsConfig::default())
            .await
            .unwrap();
        assert_eq!(stores.records.backend_name(), "memory");
        assert_eq!(stores.blobs.backend_name(), "memory");
        assert_eq!(stores.blobs.max_blob_bytes(), 10 * 1024 * 1024);
    }

    #[tokio::test]
    async fn disk_blobs_create_their_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("videos");
        let blobs = BlobsConfig {
            backend: "disk".into(),
            path: root.display().to_string(),
            max_upload_bytes: 4096,
        };
        let stores = create_stores(&RecordsConfig::default(), &blobs)
            .await
            .unwrap();
        assert_eq!(stores.blobs.backend_name(), "disk");
        assert_eq!(stores.blobs.max_blob_bytes(), 4096);
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn passthrough_blobs() {
        let blobs = BlobsConfig {
            backend: "passthrough".into(),
            ..BlobsConfig::default()
        };
        let stores = create_stores(&RecordsConfig::default(), &blobs)
            .await
            .unwrap();
        assert_eq!(stores.blobs.backend_name(), "passthrough");
    }

    #[tokio::test]
    async fn unknown_backends_are_config_errors() {
        let records = RecordsConfig {
            backend: "mongo".into(),
            ..RecordsConfig::default()
        };
        let err = create_stores(&records, &BlobsConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let blobs = BlobsConfig {
            backend: "s3".into(),
            ..BlobsConfig::default()
        };
        let err = create_stores(&RecordsConfig::default(), &blobs)
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
