//! Routing provider clients and their wire schemas.
//!
//! Two providers take part in the fallback chain:
//! - [`OrsClient`] - OpenRouteService, the primary; accepts a [`RoutePreference`].
//! - [`OsrmClient`] - the public OSRM demo server, the fallback; no preference.
//!
//! Each client returns its native schema wrapped in [`ProviderPayload`]; the
//! resolver maps that into the shared [`RoutePayload`] shape with a single
//! `match` on the variant.

mod ors;
mod osrm;

pub use ors::{OrsClient, OrsResponse, DEFAULT_ORS_BASE_URL};
pub use osrm::{OsrmClient, OsrmResponse, DEFAULT_OSRM_BASE_URL};

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::geo::Coordinate;
use crate::route::{RouteGeometry, RoutePayload, RoutePreference};

/// Instruction shown when a provider step carries no usable text.
const DEFAULT_INSTRUCTION: &str = "Proceed";

/// Upper bound for error bodies echoed into error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Provider that honours a routing preference (first in the chain).
pub trait PrimaryProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Request a route between `start` and `end` using `preference` as the
    /// routing profile hint.
    fn fetch(
        &self,
        start: Coordinate,
        end: Coordinate,
        preference: RoutePreference,
    ) -> impl Future<Output = std::result::Result<ProviderPayload, ProviderError>> + Send;
}

/// Provider used when the primary fails. It takes no preference.
pub trait FallbackProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> impl Future<Output = std::result::Result<ProviderPayload, ProviderError>> + Send;
}

/// Native response of one of the supported providers.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    Ors(OrsResponse),
    Osrm(OsrmResponse),
}

impl ProviderPayload {
    /// Map the native schema into the shared route representation.
    pub fn into_route_payload(self) -> std::result::Result<RoutePayload, ProviderError> {
        match self {
            ProviderPayload::Ors(response) => ors::normalize(response),
            ProviderPayload::Osrm(response) => osrm::normalize(response),
        }
    }
}

/// GeoJSON `LineString` geometry as returned by both providers.
#[derive(Debug, Clone, Deserialize)]
pub struct LineString {
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

impl LineString {
    fn into_geometry(
        self,
        provider: &'static str,
    ) -> std::result::Result<RouteGeometry, ProviderError> {
        let mut points = Vec::with_capacity(self.coordinates.len());
        for position in self.coordinates {
            match position.as_slice() {
                [lon, lat, ..] => points.push(Coordinate::new(*lon, *lat)),
                _ => {
                    return Err(ProviderError::malformed(
                        provider,
                        "geometry position has fewer than two components",
                    ))
                }
            }
        }
        RouteGeometry::new(points)
            .ok_or_else(|| ProviderError::malformed(provider, "route geometry has no coordinates"))
    }
}

/// Pick the first non-empty text among the candidates, else "Proceed".
fn instruction_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or(DEFAULT_INSTRUCTION)
        .to_string()
}

/// Build the HTTP client shared by a provider's requests.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("routeviz/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Read a response body, turning non-success statuses into provider errors.
async fn read_body(
    provider: &'static str,
    response: Response,
) -> std::result::Result<String, ProviderError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    if !status.is_success() {
        tracing::debug!(
            provider,
            status = status.as_u16(),
            body = %text,
            "provider returned error status"
        );
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    Ok(text)
}

/// Extract a readable message from an error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`; anything else is echoed back truncated.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let structured = ["/error/message", "/error", "/message"]
            .into_iter()
            .find_map(|pointer| value.pointer(pointer).and_then(serde_json::Value::as_str));
        if let Some(message) = structured {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

fn decode<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    text: &str,
) -> std::result::Result<T, ProviderError> {
    serde_json::from_str(text).map_err(|err| ProviderError::malformed(provider, err.to_string()))
}
