use crate::codec::RecordCodec;
use crate::config::SyncConfig;
use crate::error::{StorageError, StorageResult};
use crate::storage::BlobStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Longest delay the tokio timer wheel can represent, about 2.2
/// years. A sync interval above this disables time-based triggering
/// for the instance; count-based triggering stays active.
pub const MAX_SYNC_INTERVAL: Duration = Duration::from_millis(68_719_476_734);

pub(crate) fn validate_store_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidConfig(
            "store key must be a non-empty identifier".to_string(),
        ));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(StorageError::InvalidConfig(format!(
            "store key '{key}' may only contain ASCII alphanumerics, '.', '_' and '-'"
        )));
    }
    Ok(())
}

#[derive(Default)]
struct SyncState {
    buffer: Vec<Value>,
    since_sync: usize,
    interval_elapsed: bool,
}

/// Buffers records in memory and synchronizes them to one slot of a
/// [`BlobStore`] once either trigger fires: `count_threshold` records
/// stored since the last sync, or `sync_interval` elapsed since the
/// last sync. Earlier data under the same key is appended to, never
/// replaced, so one key can accumulate records over several sessions.
///
/// A key must be owned by exactly one instance at a time; two
/// instances sharing a key interleave unpredictably.
///
/// Flushing is all-or-nothing. If the backend rejects a write, the
/// buffer and the trigger counters are left exactly as they were and
/// the same records go out on the next trigger.
pub struct SyncStorage<B: BlobStore, C: RecordCodec> {
    backend: Arc<B>,
    codec: C,
    key: String,
    count_threshold: usize,
    sync_interval: Duration,
    timer_active: bool,
    state: Mutex<SyncState>,
    timer: Mutex<Option<JoinHandle<()>>>,
    // bumped on every rearm; a check whose epoch no longer matches was
    // cancelled after its sleep already ended and must not run
    timer_epoch: AtomicU64,
    me: Weak<Self>,
}

impl<B: BlobStore, C: RecordCodec> SyncStorage<B, C> {
    /// Create a store writing under `key` and arm the sync timer.
    ///
    /// Must be called inside a tokio runtime; the timer check runs as
    /// a spawned task.
    pub fn new(
        backend: Arc<B>,
        codec: C,
        key: impl Into<String>,
        count_threshold: usize,
        sync_interval: Duration,
    ) -> StorageResult<Arc<Self>> {
        let key = key.into();
        validate_store_key(&key)?;
        if count_threshold == 0 {
            return Err(StorageError::InvalidConfig(
                "count threshold must be at least 1".to_string(),
            ));
        }
        if sync_interval.is_zero() {
            return Err(StorageError::InvalidConfig(
                "sync interval must be positive".to_string(),
            ));
        }

        let store = Arc::new_cyclic(|me| SyncStorage {
            backend,
            codec,
            key,
            count_threshold,
            sync_interval,
            timer_active: sync_interval <= MAX_SYNC_INTERVAL,
            state: Mutex::new(SyncState::default()),
            timer: Mutex::new(None),
            timer_epoch: AtomicU64::new(0),
            me: me.clone(),
        });

        store.arm_timer();
        Ok(store)
    }

    /// Create a store from a validated [`SyncConfig`].
    pub fn from_config(backend: Arc<B>, codec: C, config: &SyncConfig) -> StorageResult<Arc<Self>> {
        SyncStorage::new(
            backend,
            codec,
            config.key.clone(),
            config.count_threshold,
            config.sync_interval,
        )
    }

    /// Buffer one record. Flushes, resets the trigger counters and
    /// rearms the timer when either trigger condition is met. A
    /// backend failure during the flush surfaces here with the record
    /// still buffered, so a later call retries it.
    pub fn store(&self, record: Value) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.buffer.push(record);
        state.since_sync += 1;

        if state.since_sync >= self.count_threshold || state.interval_elapsed {
            self.flush_locked(&mut state)?;
            state.since_sync = 0;
            state.interval_elapsed = false;
            self.arm_timer();
        }
        Ok(())
    }

    /// Synchronize whatever is buffered right now. No-op on an empty
    /// buffer; never touches the trigger counters or the timer, so it
    /// is safe to call at any point, typically right before the host
    /// application exits.
    pub fn force_sync(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        self.flush_locked(&mut state)
    }

    /// Everything recorded under this key: the persisted history
    /// followed by the in-memory buffer, in exact `store` order.
    /// Read-only.
    pub fn get_all(&self) -> StorageResult<Vec<Value>> {
        let state = self.state.lock();
        let mut records = self.read_filed()?;
        records.extend(state.buffer.iter().cloned());
        Ok(records)
    }

    /// Drop the buffer and the persisted blob. The buffer is cleared
    /// even when removing the blob fails.
    pub fn purge_all(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.buffer.clear();
        state.since_sync = 0;
        self.backend.remove(&self.key)
    }

    /// Cancel the pending sync check and flush the buffer. The
    /// teardown path: nothing buffered is lost and no timer outlives
    /// the call.
    pub fn shutdown(&self) -> StorageResult<()> {
        self.timer_epoch.fetch_add(1, Ordering::SeqCst);
        let pending = self.timer.lock().take();
        if let Some(handle) = pending {
            handle.abort();
        }
        self.force_sync()
    }

    /// Number of records buffered but not yet synchronized.
    pub fn pending(&self) -> usize {
        self.state.lock().buffer.len()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_filed(&self) -> StorageResult<Vec<Value>> {
        match self.backend.get(&self.key)? {
            Some(blob) => self.codec.decode(&blob),
            None => Ok(Vec::new()),
        }
    }

    /// Append the buffer onto the persisted blob, then clear it. Any
    /// failure leaves the buffer untouched.
    fn flush_locked(&self, state: &mut SyncState) -> StorageResult<()> {
        if state.buffer.is_empty() {
            return Ok(());
        }

        let mut records = self.read_filed()?;
        records.extend(state.buffer.iter().cloned());
        let blob = self.codec.encode(&records)?;
        self.backend.set(&self.key, blob)?;

        debug!(
            key = %self.key,
            appended = state.buffer.len(),
            total = records.len(),
            "synchronized buffered records"
        );
        state.buffer.clear();
        Ok(())
    }

    /// Cancel any pending sync check and schedule the next one. The
    /// task holds only a weak handle, so dropping the store retires
    /// the timer at its next fire.
    fn arm_timer(&self) {
        if !self.timer_active {
            return;
        }

        let weak = self.me.clone();
        let interval = self.sync_interval;
        let epoch = self.timer_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            if let Some(store) = weak.upgrade() {
                store.interval_check(epoch);
            }
        });

        if let Some(previous) = self.timer.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Scheduled sync check. An empty buffer latches the elapsed flag
    /// for the next `store` call and leaves no timer pending; a
    /// non-empty buffer is flushed now and the next check scheduled.
    fn interval_check(&self, epoch: u64) {
        let mut state = self.state.lock();
        if self.timer_epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        if state.buffer.is_empty() {
            // store() owns resetting this flag
            state.interval_elapsed = true;
            return;
        }

        match self.flush_locked(&mut state) {
            Ok(()) => {
                state.since_sync = 0;
                state.interval_elapsed = false;
            }
            Err(e) => {
                error!(
                    key = %self.key,
                    buffered = state.buffer.len(),
                    "scheduled sync failed, keeping records buffered: {e}"
                );
            }
        }
        // rearm even after a failed flush so the time trigger retries
        self.arm_timer();
    }
}

impl<B: BlobStore, C: RecordCodec> Drop for SyncStorage<B, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}
