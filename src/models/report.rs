use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bounding box for area-scoped speed average reports, south-west to
/// north-east corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub sw_longitude: f64,
    pub sw_latitude: f64,
    pub ne_longitude: f64,
    pub ne_latitude: f64,
}

/// Optional filters shared by all report queries. `kind` is passed
/// through to the server's `type` parameter untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub kind: Option<String>,
}

impl ReportQuery {
    /// Append the set filters as query parameters, ISO-8601 for the
    /// time bounds.
    pub(crate) fn append_to(&self, params: &mut Vec<(String, String)>) {
        if let Some(after) = self.after {
            params.push(("after".to_string(), after.to_rfc3339()));
        }
        if let Some(before) = self.before {
            params.push(("before".to_string(), before.to_rfc3339()));
        }
        if let Some(kind) = &self.kind {
            params.push(("type".to_string(), kind.clone()));
        }
    }
}
