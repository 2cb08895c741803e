use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier tying the fixes, routes and plans of one trip together.
/// Generated client-side so telemetry can be tagged before the server
/// has seen the journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyId(Uuid);

impl JourneyId {
    pub fn new() -> Self {
        JourneyId(Uuid::new_v4())
    }
}

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
