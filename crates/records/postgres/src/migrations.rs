use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating the records table if it does not exist.
///
/// `seq` preserves insertion order for listings; `id` is the public
/// identifier handed to clients.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let table = config.records_table();
    let index = format!("{}records_collection_seq", config.table_prefix);

    let create_records = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            seq BIGSERIAL PRIMARY KEY,
            id TEXT NOT NULL UNIQUE,
            collection TEXT NOT NULL,
            body JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );
    let create_index =
        format!("CREATE INDEX IF NOT EXISTS {index} ON {table} (collection, seq)");

    sqlx::query(&create_records).execute(pool).await?;
    sqlx::query(&create_index).execute(pool).await?;

    Ok(())
}
