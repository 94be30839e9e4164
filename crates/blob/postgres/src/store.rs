use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::PgPool;

use emogo_blob::{
    BlobError, BlobMetadata, BlobStore, ResolvedBlob, generate_key, is_valid_key,
};

use crate::config::PostgresBlobConfig;
use crate::migrations;

/// PostgreSQL-backed [`BlobStore`] keeping video bytes in a `BYTEA` column.
///
/// This is the managed backend used when records also live in `PostgreSQL`;
/// both stores can share one pool.
pub struct PostgresBlobStore {
    pool: PgPool,
    config: Arc<PostgresBlobConfig>,
}

impl std::fmt::Debug for PostgresBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresBlobStore")
            .field("table", &self.config.blobs_table())
            .field("max_blob_bytes", &self.config.max_blob_bytes)
            .finish_non_exhaustive()
    }
}

fn storage_err(e: &sqlx::Error) -> BlobError {
    BlobError::Storage(e.to_string())
}

type BlobRow = (String, String, String, i64, String, String, DateTime<Utc>, Vec<u8>);

impl PostgresBlobStore {
    /// Connect with a dedicated pool and run migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Storage`] if connecting or migrating fails.
    pub async fn new(config: PostgresBlobConfig) -> Result<Self, BlobError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .map_err(|e| storage_err(&e))?;

        Self::from_pool(pool, config).await
    }

    /// Build a store on an existing pool (typically the record store's).
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Storage`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresBlobConfig) -> Result<Self, BlobError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| storage_err(&e))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}

#[async_trait]
impl BlobStore for PostgresBlobStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn max_blob_bytes(&self) -> u64 {
        self.config.max_blob_bytes
    }

    async fn put(
        &self,
        owner: &str,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<BlobMetadata, BlobError> {
        BlobError::check_size(data.len() as u64, self.config.max_blob_bytes)?;

        // TIMESTAMPTZ keeps microseconds; truncate so reads match writes.
        let now = Utc::now().trunc_subsecs(6);
        let key = generate_key(owner, now);
        let meta = BlobMetadata::describe(key, owner, filename, content_type, &data, now);
        let size = i64::try_from(meta.size_bytes)
            .map_err(|_| BlobError::Storage(format!("size {} out of range", meta.size_bytes)))?;

        let table = self.config.blobs_table();
        let query = format!(
            "INSERT INTO {table} \
             (key, filename, content_type, size_bytes, checksum_sha256, owner, created_at, data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        sqlx::query(&query)
            .bind(&meta.key)
            .bind(&meta.filename)
            .bind(&meta.content_type)
            .bind(size)
            .bind(&meta.checksum_sha256)
            .bind(&meta.owner)
            .bind(meta.created_at)
            .bind(data.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err(&e))?;

        Ok(meta)
    }

    async fn get(&self, key: &str) -> Result<ResolvedBlob, BlobError> {
        if !is_valid_key(key) {
            return Err(BlobError::NotFound(key.to_owned()));
        }

        let table = self.config.blobs_table();
        let query = format!(
            "SELECT key, filename, content_type, size_bytes, checksum_sha256, owner, created_at, data \
             FROM {table} WHERE key = $1"
        );
        let row: Option<BlobRow> = sqlx::query_as(&query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err(&e))?;

        let (key, filename, content_type, size_bytes, checksum_sha256, owner, created_at, data) =
            row.ok_or_else(|| BlobError::NotFound(key.to_owned()))?;

        Ok(ResolvedBlob {
            metadata: BlobMetadata {
                key,
                filename,
                content_type,
                size_bytes: u64::try_from(size_bytes).unwrap_or_default(),
                checksum_sha256,
                owner,
                created_at,
            },
            data: Bytes::from(data),
        })
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        if !is_valid_key(key) {
            return Ok(false);
        }

        let table = self.config.blobs_table();
        let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE key = $1)");
        let (found,): (bool,) = sqlx::query_as(&query)
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err(&e))?;

        Ok(found)
    }
}
