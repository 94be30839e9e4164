use thiserror::Error;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The blob exceeds the maximum allowed size.
    #[error("blob too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },

    /// The key cannot name a blob in this store.
    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    /// The backend does not hold bytes and cannot accept uploads.
    #[error("operation not supported by this blob store: {0}")]
    Unsupported(String),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}

impl BlobError {
    /// Reject `size` if it is above `limit`.
    pub fn check_size(size: u64, limit: u64) -> Result<(), Self> {
        if size > limit {
            return Err(Self::TooLarge { size, limit });
        }
        Ok(())
    }
}
