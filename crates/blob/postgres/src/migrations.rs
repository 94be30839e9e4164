use sqlx::PgPool;

use crate::config::PostgresBlobConfig;

/// Create the blobs table if it does not exist.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if the DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresBlobConfig) -> Result<(), sqlx::Error> {
    let table = config.blobs_table();

    let create_blobs = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            key TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            content_type TEXT NOT NULL,
            size_bytes BIGINT NOT NULL,
            checksum_sha256 TEXT NOT NULL,
            owner TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            data BYTEA NOT NULL
        )"
    );

    sqlx::query(&create_blobs).execute(pool).await?;
    Ok(())
}
