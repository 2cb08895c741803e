use crate::journey::JourneyId;
use crate::models::fix::{Fix, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Mode of travel attached to an analyzed route segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TravelMode {
    Walk,
    Bicycle,
    Car,
    Bus,
    Tram,
    Rail,
}

/// One fix flattened into the shape the `/traces` endpoint expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracePayload {
    pub journey_id: JourneyId,
    pub longitude: f64,
    pub latitude: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl TracePayload {
    pub fn from_fix(journey_id: JourneyId, fix: &Fix) -> Self {
        let position = fix.position();
        TracePayload {
            journey_id,
            longitude: position.longitude,
            latitude: position.latitude,
            timestamp: fix.timestamp(),
            altitude: position.altitude,
        }
    }
}

/// A planned itinerary line for the `/plans` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryPayload {
    pub journey_id: JourneyId,
    pub coordinates: Vec<Position>,
    pub timestamp: DateTime<Utc>,
}

/// One analyzed leg of a journey: where it started and ended, when it
/// ended, and the speed the analysis attributed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSample {
    pub start: Position,
    pub end: Position,
    pub timestamp: DateTime<Utc>,
    pub speed: f64,
    pub mode: TravelMode,
}

/// A segment sample flattened into the shape the `/routes` endpoint expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePayload {
    pub journey_id: JourneyId,
    pub coordinates: [Position; 2],
    pub timestamp: DateTime<Utc>,
    pub speed: f64,
    pub mode: TravelMode,
}

impl RoutePayload {
    pub fn from_segment(journey_id: JourneyId, segment: &SegmentSample) -> Self {
        RoutePayload {
            journey_id,
            coordinates: [segment.start, segment.end],
            timestamp: segment.timestamp,
            speed: segment.speed,
            mode: segment.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_payload_skips_missing_altitude() {
        let journey_id = JourneyId::new();
        let ts = "2015-06-10T12:00:00Z".parse().unwrap();
        let fix = Fix::new(Position::new(24.9384, 60.1699), ts);

        let value = serde_json::to_value(TracePayload::from_fix(journey_id, &fix)).unwrap();
        assert_eq!(value["longitude"], json!(24.9384));
        assert_eq!(value["latitude"], json!(60.1699));
        assert_eq!(value["timestamp"], json!("2015-06-10T12:00:00Z"));
        assert!(value.get("altitude").is_none());
        assert_eq!(value["journey_id"], json!(journey_id.to_string()));
    }

    #[test]
    fn test_trace_payload_keeps_altitude() {
        let journey_id = JourneyId::new();
        let ts = "2015-06-10T12:00:00Z".parse().unwrap();
        let fix = Fix::new(Position::with_altitude(24.9384, 60.1699, 31.0), ts);

        let value = serde_json::to_value(TracePayload::from_fix(journey_id, &fix)).unwrap();
        assert_eq!(value["altitude"], json!(31.0));
    }

    #[test]
    fn test_route_payload_coordinates_order() {
        let journey_id = JourneyId::new();
        let segment = SegmentSample {
            start: Position::new(24.93, 60.16),
            end: Position::new(24.95, 60.17),
            timestamp: "2015-06-10T12:05:00Z".parse().unwrap(),
            speed: 4.2,
            mode: TravelMode::Bicycle,
        };

        let value = serde_json::to_value(RoutePayload::from_segment(journey_id, &segment)).unwrap();
        assert_eq!(
            value["coordinates"],
            json!([[24.93, 60.16], [24.95, 60.17]])
        );
        assert_eq!(value["mode"], json!("bicycle"));
        assert_eq!(value["speed"], json!(4.2));
    }

    #[test]
    fn test_travel_mode_string_forms() {
        assert_eq!(TravelMode::Bus.to_string(), "bus");
        assert_eq!("tram".parse::<TravelMode>().unwrap(), TravelMode::Tram);
    }
}
