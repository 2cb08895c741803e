mod blob;
mod file;
mod memory;
mod sync;

pub use blob::BlobStore;
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use sync::{MAX_SYNC_INTERVAL, SyncStorage};

pub(crate) use sync::validate_store_key;
