use thiserror::Error;

/// Errors returned by [`Gateway`](crate::Gateway) operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Client input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] emogo_core::CoreError),

    /// The uploaded payload is empty or of an unacceptable type.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// The uploaded payload exceeds the configured size limit.
    #[error("upload too large: {size} bytes exceeds limit of {limit} bytes")]
    UploadTooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },

    /// The requested record or video does not exist or cannot be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// An error occurred in the record store.
    #[error("record store error: {0}")]
    Records(#[from] emogo_records::RecordError),

    /// An error occurred in the blob store.
    #[error("blob store error: {0}")]
    Blob(#[from] emogo_blob::BlobError),

    /// The gateway was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
