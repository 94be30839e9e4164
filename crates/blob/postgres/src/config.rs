use emogo_blob::DEFAULT_MAX_BLOB_BYTES;

/// Configuration for the `PostgreSQL` blob store backend.
///
/// The blob table normally lives next to the records table, so the schema
/// and prefix mirror the record store's settings.
#[derive(Debug, Clone)]
pub struct PostgresBlobConfig {
    /// `PostgreSQL` connection URL, used only by [`PostgresBlobStore::new`](crate::PostgresBlobStore::new).
    pub url: String,

    /// Maximum number of connections when the store owns its pool.
    pub pool_size: u32,

    /// Database schema to use for tables.
    pub schema: String,

    /// Prefix applied to table names.
    pub table_prefix: String,

    /// Largest accepted upload, in bytes.
    pub max_blob_bytes: u64,
}

impl Default for PostgresBlobConfig {
    fn default() -> Self {
        Self {
            url: String::from("postgres://localhost:5432/emogo"),
            pool_size: 5,
            schema: String::from("public"),
            table_prefix: String::from("emogo_"),
            max_blob_bytes: DEFAULT_MAX_BLOB_BYTES,
        }
    }
}

impl PostgresBlobConfig {
    /// Return the fully-qualified blobs table name (`schema.prefix_blobs`).
    pub(crate) fn blobs_table(&self) -> String {
        format!("{}.{}blobs", self.schema, self.table_prefix)
    }
}
