//! Internal route representation shared by every provider.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::geo::{Bounds, Coordinate};

/// Labelled alternative shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteVariant {
    Fastest,
    Shortest,
    Eco,
}

impl RouteVariant {
    /// Variants in route-set order.
    pub const ALL: [RouteVariant; 3] = [
        RouteVariant::Fastest,
        RouteVariant::Shortest,
        RouteVariant::Eco,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RouteVariant::Fastest => "Fastest",
            RouteVariant::Shortest => "Shortest",
            RouteVariant::Eco => "Eco",
        }
    }

    /// Position of this variant inside a route set.
    pub fn index(self) -> usize {
        match self {
            RouteVariant::Fastest => 0,
            RouteVariant::Shortest => 1,
            RouteVariant::Eco => 2,
        }
    }

    /// Display color used for the variant's polyline and card.
    pub fn color(self) -> DisplayColor {
        match self {
            RouteVariant::Fastest => DisplayColor::FASTEST,
            RouteVariant::Shortest => DisplayColor::SHORTEST,
            RouteVariant::Eco => DisplayColor::ECO,
        }
    }
}

impl fmt::Display for RouteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Routing profile hint passed to providers that support one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePreference {
    Fastest,
    Shortest,
}

impl RoutePreference {
    /// Value sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutePreference::Fastest => "fastest",
            RoutePreference::Shortest => "shortest",
        }
    }
}

/// Opaque color token consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayColor(pub &'static str);

impl DisplayColor {
    pub const FASTEST: DisplayColor = DisplayColor("#2b6ef6");
    pub const SHORTEST: DisplayColor = DisplayColor("#06d6a0");
    pub const ECO: DisplayColor = DisplayColor("#ffb703");
    pub const VISITED: DisplayColor = DisplayColor("#ffd166");
    pub const BEST_PATH: DisplayColor = DisplayColor("#ff3b3b");
    pub const START: DisplayColor = DisplayColor("green");
    pub const END: DisplayColor = DisplayColor("red");
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Which provider in the fallback chain produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Primary,
    Fallback,
}

/// Total length and travel time of a route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteSummary {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnStep {
    pub instruction: String,
    pub distance_meters: f64,
}

/// Ordered, non-empty vertex sequence of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteGeometry(Vec<Coordinate>);

impl RouteGeometry {
    /// Wrap a vertex list, returning `None` when it is empty.
    pub fn new(points: Vec<Coordinate>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self(points))
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the geometry has enough vertices to be drawn or searched.
    pub fn is_renderable(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn start(&self) -> Coordinate {
        self.0[0]
    }

    pub fn end(&self) -> Coordinate {
        self.0[self.0.len() - 1]
    }

    pub fn bounds(&self) -> Bounds {
        let start = self.start();
        Bounds::from_points(&self.0).unwrap_or(Bounds {
            south_west: start,
            north_east: start,
        })
    }
}

/// Provider-independent route data: geometry, summary and turn list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePayload {
    pub geometry: RouteGeometry,
    pub summary: RouteSummary,
    pub steps: Vec<TurnStep>,
}

/// A labelled route inside a route set.
///
/// The payload is reference counted so the Eco entry can alias the payload
/// of the variant it was drawn from.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub variant: RouteVariant,
    pub payload: Arc<RoutePayload>,
    pub color: DisplayColor,
}

impl Route {
    pub fn new(variant: RouteVariant, payload: Arc<RoutePayload>) -> Self {
        Self {
            variant,
            payload,
            color: variant.color(),
        }
    }

    pub fn geometry(&self) -> &RouteGeometry {
        &self.payload.geometry
    }

    pub fn summary(&self) -> RouteSummary {
        self.payload.summary
    }

    pub fn steps(&self) -> &[TurnStep] {
        &self.payload.steps
    }

    /// Whether both routes share the very same payload allocation.
    pub fn shares_payload_with(&self, other: &Route) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}
