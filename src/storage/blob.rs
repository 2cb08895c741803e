use crate::error::StorageResult;

/// A key-value persistence medium holding one string blob per key.
/// Implementations guarantee single-key atomic reads and writes and
/// nothing more; an absent key is an empty history, not an error.
pub trait BlobStore: Send + Sync + 'static {
    /// Read the blob under `key`. `Ok(None)` when the key has never
    /// been written or was removed.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
