//! Client SDK for a mobility telemetry server.
//!
//! Two halves:
//!
//! - [`storage`]: a buffered local store for recorded fixes. Records
//!   accumulate in memory and synchronize to a [`BlobStore`] slot once
//!   either trigger fires — n records stored, or t elapsed, whichever
//!   comes first.
//! - [`api`]: an HTTP connector for the server's `/plans`, `/routes`,
//!   `/traces` and `/reports/speed-averages` endpoints.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trax::{Connector, FixCodec, JourneyId, MemoryBlobStore, SyncStorage, TraxConfig};
//!
//! let cfg = TraxConfig::load("trax.yaml".as_ref())?;
//! let backend = Arc::new(MemoryBlobStore::new());
//! let store = SyncStorage::from_config(backend, FixCodec, &cfg.sync)?;
//!
//! store.store(serde_json::to_value(&fix)?)?;      // buffered, synced per policy
//! let recorded = store.get_all()?;                // persisted ++ buffered
//!
//! let connector = Connector::new(&cfg.api)?;
//! connector.send_fixes(JourneyId::new(), &fixes).await?;
//! store.shutdown()?;                              // final sync on the way out
//! ```

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod journey;
pub mod models;
pub mod storage;

pub use api::{ApiClient, Connector};
pub use codec::{FixCodec, JsonCodec, RecordCodec};
pub use config::{ApiConfig, SyncConfig, TraxConfig};
pub use error::{StorageError, StorageResult};
pub use journey::JourneyId;
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore, SyncStorage};
