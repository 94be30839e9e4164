pub mod document;
pub mod error;
pub mod store;
pub mod testing;

pub use document::{Document, ID_FIELD, encode, new_record_id};
pub use error::RecordError;
pub use store::RecordStore;
