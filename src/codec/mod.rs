mod fix;
mod json;

pub use fix::FixCodec;
pub use json::JsonCodec;

use crate::error::StorageResult;
use serde_json::Value;

/// Converts an ordered sequence of records to and from the single
/// string blob kept in the backing store. Implementations are pure;
/// `decode` must be a left inverse of `encode` under the codec's
/// policy (exact for [`JsonCodec`], canonicalizing for [`FixCodec`]).
pub trait RecordCodec: Send + Sync + 'static {
    fn encode(&self, records: &[Value]) -> StorageResult<String>;

    fn decode(&self, blob: &str) -> StorageResult<Vec<Value>>;
}
