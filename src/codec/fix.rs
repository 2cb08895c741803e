use crate::codec::RecordCodec;
use crate::error::{StorageError, StorageResult};
use crate::models::{Fix, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compact stored form of one fix: coordinates and timestamp only.
#[derive(Debug, Serialize, Deserialize)]
struct CompactFix {
    c: Position,
    t: DateTime<Utc>,
}

/// Lossy fix codec. Strips each record down to its coordinates and
/// timestamp on encode and rebuilds the canonical fix shape
/// (`geometry.coordinates` + `properties.timestamp`) on decode, so a
/// long fix history costs a fraction of the storage of the raw
/// records. Any field outside those two is dropped.
///
/// Records that cannot be read as fixes are rejected rather than
/// silently thinned out of the history.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixCodec;

impl RecordCodec for FixCodec {
    fn encode(&self, records: &[Value]) -> StorageResult<String> {
        let compact = records
            .iter()
            .map(|record| {
                let fix: Fix = serde_json::from_value(record.clone()).map_err(|e| {
                    StorageError::MalformedBlob(format!("record is not a geographic fix: {e}"))
                })?;
                Ok(CompactFix {
                    c: fix.position(),
                    t: fix.timestamp(),
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        serde_json::to_string(&compact).map_err(|e| StorageError::MalformedBlob(e.to_string()))
    }

    fn decode(&self, blob: &str) -> StorageResult<Vec<Value>> {
        let compact: Vec<CompactFix> =
            serde_json::from_str(blob).map_err(|e| StorageError::MalformedBlob(e.to_string()))?;

        compact
            .into_iter()
            .map(|entry| {
                serde_json::to_value(Fix::new(entry.c, entry.t))
                    .map_err(|e| StorageError::MalformedBlob(e.to_string()))
            })
            .collect()
    }
}
