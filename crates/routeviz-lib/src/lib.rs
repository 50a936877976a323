//! routeviz library entry points.
//!
//! This crate turns two coordinates into three labelled driving routes
//! (fastest, shortest, eco) using a primary routing provider with a single
//! fallback, explores the active route with Dijkstra for visualization, and
//! drives a host-supplied renderer through the active-route state machine.
//! Front-ends (the CLI, map widgets) should depend on the items exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod controller;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod route;
pub mod route_set;
pub mod search;

pub use config::{animation_interval, ControllerOptions, EngineConfig};
pub use controller::{
    ActiveRouteController, ActiveSelection, ComputeOutcome, ComputeTicket, ControllerState,
};
pub use error::{Error, ProviderError, Result};
pub use geo::{haversine, Bounds, Coordinate};
pub use geocode::{parse_coordinate_literal, Geocoder, LiteralGeocoder};
pub use provider::{FallbackProvider, OrsClient, OsrmClient, PrimaryProvider, ProviderPayload};
pub use render::{LineStyle, MapRenderer, MarkerKind};
pub use resolver::{DefaultResolver, ProviderResolver, Resolved, ResolvedPair};
pub use route::{
    DisplayColor, ProviderKind, Route, RouteGeometry, RoutePayload, RoutePreference, RouteSummary,
    RouteVariant, TurnStep,
};
pub use route_set::RouteSet;
pub use search::{search, PathGraph, SearchResult};
