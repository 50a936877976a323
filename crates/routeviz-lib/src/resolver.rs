//! Primary/fallback routing provider chain.
//!
//! The resolver asks the primary provider first, passing the routing
//! preference. Any primary failure (transport, status, malformed payload or a
//! missing API key) sends the request to the single fallback provider. There
//! are no retries beyond that one fallback and no timeouts beyond the HTTP
//! client's own.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{Error, ProviderError, Result};
use crate::geo::Coordinate;
use crate::provider::{FallbackProvider, OrsClient, OsrmClient, PrimaryProvider};
use crate::route::{ProviderKind, RoutePayload, RoutePreference};

/// A normalized payload together with the provider that produced it.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub payload: Arc<RoutePayload>,
    pub source: ProviderKind,
}

/// Payloads for both preferences of one route computation.
///
/// After a fallback, `fastest` and `shortest` are the same allocation.
#[derive(Debug, Clone)]
pub struct ResolvedPair {
    pub fastest: Arc<RoutePayload>,
    pub shortest: Arc<RoutePayload>,
    pub source: ProviderKind,
}

/// Resolver wired to the production providers.
pub type DefaultResolver = ProviderResolver<OrsClient, OsrmClient>;

/// Primary/fallback provider chain.
#[derive(Debug, Clone)]
pub struct ProviderResolver<P, F> {
    primary: P,
    fallback: Option<F>,
}

impl<P, F> ProviderResolver<P, F>
where
    P: PrimaryProvider,
    F: FallbackProvider,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    /// Resolver with no fallback; primary failures surface as
    /// [`Error::FallbackUnavailable`].
    pub fn primary_only(primary: P) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Resolve a single route for `preference`.
    pub async fn resolve(
        &self,
        start: Coordinate,
        end: Coordinate,
        preference: RoutePreference,
    ) -> Result<Resolved> {
        match self.fetch_primary(start, end, preference).await {
            Ok(payload) => Ok(Resolved {
                payload: Arc::new(payload),
                source: ProviderKind::Primary,
            }),
            Err(primary) => {
                let payload = self.fetch_fallback(start, end, primary).await?;
                Ok(Resolved {
                    payload: Arc::new(payload),
                    source: ProviderKind::Fallback,
                })
            }
        }
    }

    /// Resolve the fastest and shortest routes in one go.
    ///
    /// Both primary requests run concurrently. If either fails, a single
    /// fallback request answers for both preferences.
    pub async fn resolve_pair(&self, start: Coordinate, end: Coordinate) -> Result<ResolvedPair> {
        let (fastest, shortest) = tokio::join!(
            self.fetch_primary(start, end, RoutePreference::Fastest),
            self.fetch_primary(start, end, RoutePreference::Shortest),
        );

        match (fastest, shortest) {
            (Ok(fastest), Ok(shortest)) => Ok(ResolvedPair {
                fastest: Arc::new(fastest),
                shortest: Arc::new(shortest),
                source: ProviderKind::Primary,
            }),
            (Err(primary), _) | (_, Err(primary)) => {
                let payload = Arc::new(self.fetch_fallback(start, end, primary).await?);
                Ok(ResolvedPair {
                    fastest: Arc::clone(&payload),
                    shortest: payload,
                    source: ProviderKind::Fallback,
                })
            }
        }
    }

    async fn fetch_primary(
        &self,
        start: Coordinate,
        end: Coordinate,
        preference: RoutePreference,
    ) -> std::result::Result<RoutePayload, ProviderError> {
        self.primary
            .fetch(start, end, preference)
            .await?
            .into_route_payload()
    }

    async fn fetch_fallback(
        &self,
        start: Coordinate,
        end: Coordinate,
        primary: ProviderError,
    ) -> Result<RoutePayload> {
        let Some(fallback) = &self.fallback else {
            tracing::warn!(
                provider = self.primary.name(),
                error = %primary,
                "primary provider failed and no fallback is configured"
            );
            return Err(Error::FallbackUnavailable { primary });
        };

        tracing::warn!(
            provider = self.primary.name(),
            fallback = fallback.name(),
            error = %primary,
            "primary provider failed, using fallback"
        );

        match fallback
            .fetch(start, end)
            .await
            .and_then(|payload| payload.into_route_payload())
        {
            Ok(payload) => Ok(payload),
            Err(fallback_error) => {
                tracing::warn!(
                    provider = fallback.name(),
                    error = %fallback_error,
                    "fallback provider failed"
                );
                Err(Error::ProviderFailure {
                    primary,
                    fallback: fallback_error,
                })
            }
        }
    }
}

impl DefaultResolver {
    /// Build the ORS → OSRM chain described by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let primary = OrsClient::new(
            config.ors_base_url.clone(),
            config.ors_api_key.clone(),
            config.http_timeout,
        )?;
        if !primary.has_credential() {
            tracing::info!("no OpenRouteService API key configured; routing will use the fallback");
        }

        let resolver = match &config.osrm_base_url {
            Some(base_url) => {
                let fallback = OsrmClient::new(base_url.clone(), config.http_timeout)?;
                Self::new(primary, fallback)
            }
            None => Self::primary_only(primary),
        };
        Ok(resolver)
    }
}
