use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair with optional altitude, serialized as a
/// 2- or 3-element coordinate array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
}

impl Position {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Position {
            longitude,
            latitude,
            altitude: None,
        }
    }

    pub fn with_altitude(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Position {
            longitude,
            latitude,
            altitude: Some(altitude),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.altitude.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.longitude)?;
        seq.serialize_element(&self.latitude)?;
        if let Some(altitude) = self.altitude {
            seq.serialize_element(&altitude)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = Vec::<f64>::deserialize(deserializer)?;
        match coords[..] {
            [longitude, latitude] => Ok(Position::new(longitude, latitude)),
            [longitude, latitude, altitude] => {
                Ok(Position::with_altitude(longitude, latitude, altitude))
            }
            _ => Err(D::Error::invalid_length(
                coords.len(),
                &"2 or 3 coordinate components",
            )),
        }
    }
}

/// A single positioned observation from the device. Mirrors the wire
/// shape the server expects: point geometry plus a timestamp property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub geometry: PointGeometry,
    pub properties: FixProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub coordinates: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixProperties {
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn new(position: Position, timestamp: DateTime<Utc>) -> Self {
        Fix {
            geometry: PointGeometry {
                coordinates: position,
            },
            properties: FixProperties { timestamp },
        }
    }

    pub fn position(&self) -> Position {
        self.geometry.coordinates
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.properties.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_roundtrip_without_altitude() {
        let pos = Position::new(24.9384, 60.1699);
        let value = serde_json::to_value(pos).unwrap();
        assert_eq!(value, json!([24.9384, 60.1699]));

        let back: Position = serde_json::from_value(value).unwrap();
        assert_eq!(back, pos);
    }

    #[test]
    fn test_position_roundtrip_with_altitude() {
        let pos = Position::with_altitude(24.9384, 60.1699, 12.5);
        let value = serde_json::to_value(pos).unwrap();
        assert_eq!(value, json!([24.9384, 60.1699, 12.5]));

        let back: Position = serde_json::from_value(value).unwrap();
        assert_eq!(back, pos);
    }

    #[test]
    fn test_position_rejects_bad_arity() {
        assert!(serde_json::from_value::<Position>(json!([24.9384])).is_err());
        assert!(serde_json::from_value::<Position>(json!([1.0, 2.0, 3.0, 4.0])).is_err());
    }

    #[test]
    fn test_fix_wire_shape() {
        let ts = "2015-06-10T12:00:00Z".parse().unwrap();
        let fix = Fix::new(Position::new(24.9384, 60.1699), ts);
        let value = serde_json::to_value(&fix).unwrap();

        assert_eq!(value["geometry"]["coordinates"], json!([24.9384, 60.1699]));
        assert_eq!(
            value["properties"]["timestamp"],
            json!("2015-06-10T12:00:00Z")
        );
    }
}
