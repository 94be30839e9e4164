pub mod error;
pub mod key;
pub mod passthrough;
pub mod store;
pub mod testing;
pub mod types;

pub use error::BlobError;
pub use key::{generate_key, is_absolute_url, is_valid_key};
pub use passthrough::UrlPassthroughBlobStore;
pub use store::BlobStore;
pub use types::{BlobMetadata, DEFAULT_MAX_BLOB_BYTES, ResolvedBlob};
