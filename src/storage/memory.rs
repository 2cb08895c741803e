use crate::error::{StorageError, StorageResult};
use crate::storage::BlobStore;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory blob store for development and tests. Supports failure
/// injection so flush atomicity can be exercised without a real
/// backend outage.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` and `remove` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw blob access for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.get(key).map(|entry| entry.value().clone())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::BackendRead("injected read failure".to_string()));
        }
        Ok(self.blobs.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::BackendWrite(
                "injected write failure".to_string(),
            ));
        }
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::BackendWrite(
                "injected write failure".to_string(),
            ));
        }
        self.blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "blob".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("blob".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        assert!(MemoryBlobStore::new().remove("missing").is_ok());
    }

    #[test]
    fn test_failure_injection() {
        let store = MemoryBlobStore::new();
        store.set("k", "blob".to_string()).unwrap();

        store.set_fail_writes(true);
        assert!(matches!(
            store.set("k", "other".to_string()),
            Err(StorageError::BackendWrite(_))
        ));

        store.set_fail_reads(true);
        assert!(matches!(store.get("k"), Err(StorageError::BackendRead(_))));

        store.set_fail_reads(false);
        store.set_fail_writes(false);
        assert_eq!(store.get("k").unwrap(), Some("blob".to_string()));
    }
}
