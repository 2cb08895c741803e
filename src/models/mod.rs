pub mod fix;
pub mod payloads;
pub mod report;

pub use fix::{Fix, FixProperties, PointGeometry, Position};
pub use payloads::{ItineraryPayload, RoutePayload, SegmentSample, TracePayload, TravelMode};
pub use report::{Boundary, ReportQuery};
