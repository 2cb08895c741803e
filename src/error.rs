use thiserror::Error;

/// Failure taxonomy for the storage layer. Codec and backend failures
/// keep their own variants so callers can decide between purging a
/// corrupt slot and retrying a transient backend fault.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed blob: {0}")]
    MalformedBlob(String),

    #[error("backing store read failed: {0}")]
    BackendRead(String),

    #[error("backing store write failed: {0}")]
    BackendWrite(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
