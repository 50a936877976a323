//! Classification of a fastest/shortest pair into the three labelled routes.
//!
//! Eco is never requested from a provider; it aliases the payload of the
//! shorter route.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::provider::{FallbackProvider, PrimaryProvider};
use crate::resolver::{ProviderResolver, ResolvedPair};
use crate::route::{ProviderKind, Route, RoutePayload, RouteVariant};

/// The three labelled alternatives of one computation, in
/// Fastest/Shortest/Eco order.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSet {
    routes: [Route; 3],
    source: ProviderKind,
}

impl RouteSet {
    /// Label a fastest/shortest pair and derive the Eco entry.
    ///
    /// Eco reuses whichever payload is shorter in distance; on a tie it
    /// reuses Fastest. Nothing is recomputed.
    pub fn classify(
        fastest: Arc<RoutePayload>,
        shortest: Arc<RoutePayload>,
        source: ProviderKind,
    ) -> Self {
        let eco = if fastest.summary.distance_meters <= shortest.summary.distance_meters {
            Arc::clone(&fastest)
        } else {
            Arc::clone(&shortest)
        };

        Self {
            routes: [
                Route::new(RouteVariant::Fastest, fastest),
                Route::new(RouteVariant::Shortest, shortest),
                Route::new(RouteVariant::Eco, eco),
            ],
            source,
        }
    }

    pub fn from_pair(pair: ResolvedPair) -> Self {
        Self::classify(pair.fastest, pair.shortest, pair.source)
    }

    /// Resolve both preferences for the given endpoints and classify them.
    pub async fn compute<P, F>(
        resolver: &ProviderResolver<P, F>,
        start: Option<Coordinate>,
        end: Option<Coordinate>,
    ) -> Result<Self>
    where
        P: PrimaryProvider,
        F: FallbackProvider,
    {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(Error::MissingEndpoints);
        };

        let pair = resolver.resolve_pair(start, end).await?;
        let set = Self::from_pair(pair);
        tracing::debug!(
            source = ?set.source,
            eco = %set.eco_source(),
            "classified route set"
        );
        Ok(set)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn variant(&self, variant: RouteVariant) -> &Route {
        &self.routes[variant.index()]
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn source(&self) -> ProviderKind {
        self.source
    }

    /// The variant whose payload Eco reuses.
    pub fn eco_source(&self) -> RouteVariant {
        let eco = self.variant(RouteVariant::Eco);
        if eco.shares_payload_with(self.variant(RouteVariant::Fastest)) {
            RouteVariant::Fastest
        } else {
            RouteVariant::Shortest
        }
    }

    /// Status-bar line summarising the set from its Fastest route.
    pub fn summary_line(&self) -> String {
        let summary = self.variant(RouteVariant::Fastest).summary();
        format!(
            "Routes: {} • Primary Distance {:.2} km • Time {:.1} min",
            self.len(),
            summary.distance_km(),
            summary.duration_minutes()
        )
    }
}
