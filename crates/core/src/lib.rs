pub mod collection;
pub mod error;
pub mod record;
pub mod types;

pub use collection::Collection;
pub use error::CoreError;
pub use record::{
    GpsRecord, Location, NewGps, NewSentiment, NewVlog, SentimentRecord, VlogRecord,
    VlogUploadMeta, ingestion_timestamp,
};
pub use types::{RecordId, UserId};
