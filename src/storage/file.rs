use crate::error::{StorageError, StorageResult};
use crate::storage::BlobStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Blob store keeping one file per key under a root directory. Writes
/// go through a temp file and rename so a crash mid-write never leaves
/// a truncated blob behind.
#[derive(Debug)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StorageError::BackendWrite(format!("create {}: {e}", root.display())))?;
        Ok(FileBlobStore { root })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: &Path, value: &str) -> StorageResult<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| StorageError::BackendWrite(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, path)
            .map_err(|e| StorageError::BackendWrite(format!("rename {}: {e}", path.display())))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::BackendRead(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.write_atomic(&self.blob_path(key), &value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.blob_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::BackendWrite(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}
