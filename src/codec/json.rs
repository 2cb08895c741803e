use crate::codec::RecordCodec;
use crate::error::{StorageError, StorageResult};
use serde_json::Value;

/// Lossless pass-through codec: records are stored exactly as given,
/// as one JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode(&self, records: &[Value]) -> StorageResult<String> {
        serde_json::to_string(records).map_err(|e| StorageError::MalformedBlob(e.to_string()))
    }

    fn decode(&self, blob: &str) -> StorageResult<Vec<Value>> {
        serde_json::from_str(blob).map_err(|e| StorageError::MalformedBlob(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_is_exact() {
        let records = vec![
            json!({"a": 1, "nested": {"b": [1, 2, 3]}}),
            json!("plain string"),
            json!(42.5),
            json!(null),
        ];

        let codec = JsonCodec;
        let blob = codec.encode(&records).unwrap();
        assert_eq!(codec.decode(&blob).unwrap(), records);
    }

    #[test]
    fn test_empty_sequence() {
        let codec = JsonCodec;
        let blob = codec.encode(&[]).unwrap();
        assert_eq!(codec.decode(&blob).unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            JsonCodec.decode("not json"),
            Err(StorageError::MalformedBlob(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(matches!(
            JsonCodec.decode("{\"a\": 1}"),
            Err(StorageError::MalformedBlob(_))
        ));
    }
}
