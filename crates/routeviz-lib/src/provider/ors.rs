use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{
    build_client, decode, instruction_text, read_body, LineString, PrimaryProvider,
    ProviderPayload,
};
use crate::error::{ProviderError, Result};
use crate::geo::Coordinate;
use crate::route::{RoutePayload, RoutePreference, RouteSummary, TurnStep};

const PROVIDER: &str = "openrouteservice";

/// Default public OpenRouteService endpoint.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// OpenRouteService directions client (GeoJSON output).
#[derive(Debug, Clone)]
pub struct OrsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OrsClient {
    /// Create a client. Without an API key every request fails with
    /// [`ProviderError::MissingCredential`], which sends the resolver to the
    /// fallback.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn directions_url(&self) -> String {
        format!("{}/v2/directions/driving-car/geojson", self.base_url)
    }
}

impl PrimaryProvider for OrsClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(
        &self,
        start: Coordinate,
        end: Coordinate,
        preference: RoutePreference,
    ) -> std::result::Result<ProviderPayload, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential { provider: PROVIDER })?;

        let url = self.directions_url();
        let body = json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]],
            "instructions": true,
            "preference": preference.as_str(),
        });
        tracing::debug!(
            provider = PROVIDER,
            preference = preference.as_str(),
            %start,
            %end,
            "requesting directions"
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                provider: PROVIDER,
                source,
            })?;

        let text = read_body(PROVIDER, response).await?;
        let parsed: OrsResponse = decode(PROVIDER, &text)?;
        Ok(ProviderPayload::Ors(parsed))
    }
}

/// GeoJSON `FeatureCollection` returned by the ORS directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OrsResponse {
    #[serde(default)]
    pub features: Vec<OrsFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrsFeature {
    #[serde(default)]
    pub properties: OrsProperties,
    pub geometry: LineString,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrsProperties {
    /// ORS omits zero-valued summary fields, so everything defaults.
    #[serde(default)]
    pub summary: OrsSummary,
    #[serde(default)]
    pub segments: Vec<OrsSegment>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrsSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrsSegment {
    #[serde(default)]
    pub steps: Vec<OrsStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrsStep {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Flatten per-segment steps of the first feature into the shared shape.
pub(super) fn normalize(
    response: OrsResponse,
) -> std::result::Result<RoutePayload, ProviderError> {
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| {
            ProviderError::malformed(PROVIDER, "response contained no route features")
        })?;

    let geometry = feature.geometry.into_geometry(PROVIDER)?;
    let summary = RouteSummary {
        distance_meters: feature.properties.summary.distance.max(0.0),
        duration_seconds: feature.properties.summary.duration.max(0.0),
    };
    let steps = feature
        .properties
        .segments
        .into_iter()
        .flat_map(|segment| segment.steps)
        .map(|step| TurnStep {
            instruction: instruction_text([step.instruction.as_deref(), step.name.as_deref()]),
            distance_meters: step.distance.max(0.0),
        })
        .collect();

    Ok(RoutePayload {
        geometry,
        summary,
        steps,
    })
}
