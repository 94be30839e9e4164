mod store;

pub use store::LocalDiskBlobStore;
