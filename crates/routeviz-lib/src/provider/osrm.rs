use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{
    build_client, decode, instruction_text, read_body, FallbackProvider, LineString,
    ProviderPayload,
};
use crate::error::{ProviderError, Result};
use crate::geo::Coordinate;
use crate::route::{RoutePayload, RouteSummary, TurnStep};

const PROVIDER: &str = "osrm";

/// Default public OSRM demo server.
pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// OSRM `route` service client. OSRM has no notion of a routing preference.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url, start.lon, start.lat, end.lon, end.lat
        )
    }
}

impl FallbackProvider for OsrmClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> std::result::Result<ProviderPayload, ProviderError> {
        let url = self.route_url(start, end);
        tracing::debug!(provider = PROVIDER, %start, %end, "requesting route");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|source| ProviderError::Transport {
                    provider: PROVIDER,
                    source,
                })?;

        let text = read_body(PROVIDER, response).await?;
        let parsed: OsrmResponse = decode(PROVIDER, &text)?;
        Ok(ProviderPayload::Osrm(parsed))
    }
}

/// Body of an OSRM `route` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    pub geometry: LineString,
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmLeg {
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmStep {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub maneuver: Option<OsrmManeuver>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmManeuver {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
}

/// Flatten the per-leg steps of the first route into the shared shape.
pub(super) fn normalize(
    response: OsrmResponse,
) -> std::result::Result<RoutePayload, ProviderError> {
    if response.code != "Ok" {
        let detail = response.message.unwrap_or_default();
        return Err(ProviderError::malformed(
            PROVIDER,
            format!("response code {} {}", response.code, detail)
                .trim_end()
                .to_string(),
        ));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::malformed(PROVIDER, "No OSRM route"))?;

    let geometry = route.geometry.into_geometry(PROVIDER)?;
    let steps = route
        .legs
        .into_iter()
        .flat_map(|leg| leg.steps)
        .map(|step| {
            let maneuver = step.maneuver.as_ref().and_then(|m| m.kind.as_deref());
            TurnStep {
                instruction: instruction_text([step.name.as_deref(), maneuver]),
                distance_meters: step.distance.max(0.0),
            }
        })
        .collect();

    Ok(RoutePayload {
        geometry,
        summary: RouteSummary {
            distance_meters: route.distance.max(0.0),
            duration_seconds: route.duration.max(0.0),
        },
        steps,
    })
}
