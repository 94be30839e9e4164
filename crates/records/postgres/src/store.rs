use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::info;

use emogo_core::Collection;
use emogo_records::{Document, RecordError, RecordStore, new_record_id};

use crate::config::PostgresConfig;
use crate::migrations;

/// PostgreSQL-backed implementation of [`RecordStore`].
///
/// All collections share one table; each row stores the document body as
/// `JSONB` and a `BIGSERIAL` sequence that fixes listing order.
pub struct PostgresRecordStore {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl std::fmt::Debug for PostgresRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRecordStore")
            .field("table", &self.config.records_table())
            .finish_non_exhaustive()
    }
}

fn backend_err(e: &sqlx::Error) -> RecordError {
    RecordError::Backend(e.to_string())
}

impl PostgresRecordStore {
    /// Create a new `PostgresRecordStore` from the provided configuration.
    ///
    /// Connects to `PostgreSQL`, creates the connection pool, and runs
    /// migrations to ensure the records table exists.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Connection`] if pool creation fails, or
    /// [`RecordError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, RecordError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .map_err(|e| RecordError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a `PostgresRecordStore` from an existing pool and config.
    ///
    /// This is useful for sharing a pool with the managed blob backend.
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Backend`] if migrations fail.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, RecordError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| backend_err(&e))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(
        &self,
        collection: Collection,
        body: Map<String, Value>,
    ) -> Result<Document, RecordError> {
        let doc = Document::new(new_record_id(), body);
        let table = self.config.records_table();

        let query = format!("INSERT INTO {table} (id, collection, body) VALUES ($1, $2, $3)");
        sqlx::query(&query)
            .bind(&doc.id)
            .bind(collection.as_str())
            .bind(Json(&doc.body))
            .execute(&self.pool)
            .await
            .map_err(|e| backend_err(&e))?;

        Ok(doc)
    }

    async fn list(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<Document>, RecordError> {
        let table = self.config.records_table();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let query = format!(
            "SELECT id, body FROM {table} \
             WHERE collection = $1 \
             ORDER BY seq ASC \
             LIMIT $2"
        );
        let rows: Vec<(String, Json<Map<String, Value>>)> = sqlx::query_as(&query)
            .bind(collection.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| backend_err(&e))?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| Document { id, body })
            .collect())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, RecordError> {
        let table = self.config.records_table();

        let query = format!("SELECT id, body FROM {table} WHERE collection = $1 AND id = $2");
        let row: Option<(String, Json<Map<String, Value>>)> = sqlx::query_as(&query)
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend_err(&e))?;

        Ok(row.map(|(id, Json(body))| Document { id, body }))
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("postgres record store pool closed");
    }
}
