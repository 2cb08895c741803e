use crate::api::client::{
    ApiClient, ENDPOINT_PLANS, ENDPOINT_ROUTES, ENDPOINT_SPEEDS, ENDPOINT_TRACES,
};
use crate::config::ApiConfig;
use crate::journey::JourneyId;
use crate::models::{
    Boundary, Fix, ItineraryPayload, Position, ReportQuery, RoutePayload, SegmentSample,
    TracePayload,
};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// High-level connector bound to one telemetry server. Marshals
/// domain values into the wire payloads the server expects and hands
/// them to the endpoint client.
pub struct Connector {
    client: ApiClient,
}

impl Connector {
    pub fn new(config: &ApiConfig) -> Result<Self, anyhow::Error> {
        Ok(Connector {
            client: ApiClient::new(config)?,
        })
    }

    pub fn from_client(client: ApiClient) -> Self {
        Connector { client }
    }

    /// Fetch a previously submitted plan by id.
    pub async fn get_plan(&self, plan_id: &str) -> Result<Value, anyhow::Error> {
        self.client
            .get(&[ENDPOINT_PLANS, plan_id], &[])
            .await?
            .json()
            .await
            .context("reading plan response body")
    }

    /// Submit a planned itinerary. The server answers with the stored
    /// plan, id included.
    pub async fn send_plan(&self, itinerary: &ItineraryPayload) -> Result<Value, anyhow::Error> {
        self.client
            .post(&[ENDPOINT_PLANS], itinerary)
            .await?
            .json()
            .await
            .context("reading plan response body")
    }

    /// Convenience wrapper building the itinerary payload from its
    /// parts before submitting it.
    pub async fn send_itinerary(
        &self,
        journey_id: JourneyId,
        coordinates: Vec<Position>,
        timestamp: DateTime<Utc>,
    ) -> Result<Value, anyhow::Error> {
        self.send_plan(&ItineraryPayload {
            journey_id,
            coordinates,
            timestamp,
        })
        .await
    }

    /// Upload one or more recorded fixes as traces of `journey_id`.
    pub async fn send_fixes(
        &self,
        journey_id: JourneyId,
        fixes: &[Fix],
    ) -> Result<(), anyhow::Error> {
        let payload: Vec<TracePayload> = fixes
            .iter()
            .map(|fix| TracePayload::from_fix(journey_id, fix))
            .collect();
        self.client.post(&[ENDPOINT_TRACES], &payload).await?;
        Ok(())
    }

    /// Upload one or more analyzed journey segments as routes of
    /// `journey_id`.
    pub async fn send_routes(
        &self,
        journey_id: JourneyId,
        segments: &[SegmentSample],
    ) -> Result<(), anyhow::Error> {
        let payload: Vec<RoutePayload> = segments
            .iter()
            .map(|segment| RoutePayload::from_segment(journey_id, segment))
            .collect();
        self.client.post(&[ENDPOINT_ROUTES], &payload).await?;
        Ok(())
    }

    /// Speed averages inside a bounding box, optionally filtered.
    pub async fn speed_averages_for_boundary(
        &self,
        boundary: Boundary,
        query: &ReportQuery,
    ) -> Result<Value, anyhow::Error> {
        let mut params = boundary_params(boundary);
        query.append_to(&mut params);
        self.client
            .get(&[ENDPOINT_SPEEDS], &params)
            .await?
            .json()
            .await
            .context("reading speed averages response body")
    }

    /// Speed averages along a stored itinerary, optionally filtered.
    pub async fn speed_averages_for_itinerary(
        &self,
        plan_id: &str,
        query: &ReportQuery,
    ) -> Result<Value, anyhow::Error> {
        let mut params = vec![("planID".to_string(), plan_id.to_string())];
        query.append_to(&mut params);
        self.client
            .get(&[ENDPOINT_SPEEDS], &params)
            .await?
            .json()
            .await
            .context("reading speed averages response body")
    }
}

fn boundary_params(boundary: Boundary) -> Vec<(String, String)> {
    vec![
        (
            "boundary_sw_lon".to_string(),
            boundary.sw_longitude.to_string(),
        ),
        (
            "boundary_sw_lat".to_string(),
            boundary.sw_latitude.to_string(),
        ),
        (
            "boundary_ne_lon".to_string(),
            boundary.ne_longitude.to_string(),
        ),
        (
            "boundary_ne_lat".to_string(),
            boundary.ne_latitude.to_string(),
        ),
    ]
}
