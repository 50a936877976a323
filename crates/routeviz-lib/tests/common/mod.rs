//! Common test utilities: fake routing providers backed by JSON fixtures and
//! a renderer that records every call it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use routeviz_lib::{
    Bounds, Coordinate, DisplayColor, FallbackProvider, LineStyle, MapRenderer, MarkerKind,
    PrimaryProvider, ProviderError, ProviderPayload, ProviderResolver, Route, RoutePreference,
    SearchResult, TurnStep,
};

pub const DELHI: Coordinate = Coordinate::new(77.209, 28.6139);
pub const CONNAUGHT_PLACE: Coordinate = Coordinate::new(77.22, 28.62);

/// Geometry of the fixture routes between [`DELHI`] and [`CONNAUGHT_PLACE`].
pub fn fixture_coordinates(vertices: usize) -> Vec<[f64; 2]> {
    let steps = (vertices.max(2) - 1) as f64;
    (0..vertices.max(2))
        .map(|i| {
            let t = i as f64 / steps;
            [
                DELHI.lon + (CONNAUGHT_PLACE.lon - DELHI.lon) * t,
                DELHI.lat + (CONNAUGHT_PLACE.lat - DELHI.lat) * t,
            ]
        })
        .collect()
}

/// ORS directions body with one feature.
pub fn ors_body(distance: f64, duration: f64, vertices: usize) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {
                "summary": { "distance": distance, "duration": duration },
                "segments": [{
                    "distance": distance,
                    "duration": duration,
                    "steps": [
                        { "distance": distance * 0.4, "duration": 1.0, "instruction": "Head north on Janpath", "name": "Janpath" },
                        { "distance": distance * 0.6, "duration": 1.0, "instruction": "Arrive at Connaught Place", "name": "-" }
                    ]
                }]
            },
            "geometry": { "type": "LineString", "coordinates": fixture_coordinates(vertices) }
        }]
    })
}

/// OSRM route body with one route.
pub fn osrm_body(distance: f64, duration: f64, vertices: usize) -> Value {
    json!({
        "code": "Ok",
        "routes": [{
            "distance": distance,
            "duration": duration,
            "geometry": { "type": "LineString", "coordinates": fixture_coordinates(vertices) },
            "legs": [{
                "steps": [
                    { "distance": distance, "name": "Janpath", "maneuver": { "type": "depart" } },
                    { "distance": 0.0, "name": "", "maneuver": { "type": "arrive" } }
                ]
            }]
        }],
        "waypoints": []
    })
}

/// Canned answer of a fake provider.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Route(Value),
    Status(u16),
    MissingKey,
}

impl Reply {
    fn into_result(
        self,
        provider: &'static str,
        wrap: fn(Value) -> ProviderPayload,
    ) -> Result<ProviderPayload, ProviderError> {
        match self {
            Reply::Route(body) => Ok(wrap(body)),
            Reply::Status(status) => Err(ProviderError::Status {
                provider,
                status,
                message: "fixture failure".to_string(),
            }),
            Reply::MissingKey => Err(ProviderError::MissingCredential { provider }),
        }
    }
}

fn ors_payload(body: Value) -> ProviderPayload {
    ProviderPayload::Ors(serde_json::from_value(body).expect("valid ORS fixture"))
}

fn osrm_payload(body: Value) -> ProviderPayload {
    ProviderPayload::Osrm(serde_json::from_value(body).expect("valid OSRM fixture"))
}

/// Primary provider answering per preference.
#[derive(Debug, Clone)]
pub struct FakePrimary {
    pub fastest: Reply,
    pub shortest: Reply,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakePrimary {
    pub fn new(fastest: Reply, shortest: Reply) -> Self {
        Self {
            fastest,
            shortest,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Primary returning ORS routes with the given distances.
    pub fn routes(fastest_m: f64, shortest_m: f64) -> Self {
        Self::new(
            Reply::Route(ors_body(fastest_m, fastest_m / 8.0, 6)),
            Reply::Route(ors_body(shortest_m, shortest_m / 7.0, 5)),
        )
    }

    pub fn failing(status: u16) -> Self {
        Self::new(Reply::Status(status), Reply::Status(status))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PrimaryProvider for FakePrimary {
    fn name(&self) -> &'static str {
        "fake-primary"
    }

    async fn fetch(
        &self,
        _start: Coordinate,
        _end: Coordinate,
        preference: RoutePreference,
    ) -> Result<ProviderPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = match preference {
            RoutePreference::Fastest => self.fastest.clone(),
            RoutePreference::Shortest => self.shortest.clone(),
        };
        reply.into_result(self.name(), ors_payload)
    }
}

/// Fallback provider with a single canned answer.
#[derive(Debug, Clone)]
pub struct FakeFallback {
    pub reply: Reply,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FakeFallback {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn route(distance_m: f64) -> Self {
        Self::new(Reply::Route(osrm_body(distance_m, distance_m / 9.0, 4)))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FallbackProvider for FakeFallback {
    fn name(&self) -> &'static str {
        "fake-fallback"
    }

    async fn fetch(
        &self,
        _start: Coordinate,
        _end: Coordinate,
    ) -> Result<ProviderPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().into_result(self.name(), osrm_payload)
    }
}

#[allow(dead_code)]
pub fn resolver(primary: FakePrimary, fallback: FakeFallback) -> ProviderResolver<FakePrimary, FakeFallback> {
    ProviderResolver::new(primary, fallback)
}

/// One call received by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Event {
    DrawRoutes(usize),
    ClearRoutes,
    Style(usize, LineStyle),
    Hide(usize),
    Show(usize),
    Fit(Bounds),
    Marker(MarkerKind, Coordinate),
    ClearMarker(MarkerKind),
    Turns(Vec<String>),
    Search { visited: usize, path: usize },
    ClearSearch,
    BeginAnimation(usize, LineStyle),
    Extend(Coordinate),
    FinishAnimation(usize),
    CancelAnimation,
    Status(String),
}

/// Renderer that keeps a log of every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<Event>,
}

#[allow(dead_code)]
impl RecordingRenderer {
    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Status(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every style applied to route `index`, oldest first.
    pub fn styles(&self, index: usize) -> Vec<LineStyle> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Style(i, style) if *i == index => Some(*style),
                _ => None,
            })
            .collect()
    }

    /// Most recent style applied to route `index`.
    pub fn last_style(&self, index: usize) -> Option<LineStyle> {
        self.events.iter().rev().find_map(|event| match event {
            Event::Style(i, style) if *i == index => Some(*style),
            _ => None,
        })
    }

    /// Vertices appended since the most recent animation began.
    pub fn animated_points(&self) -> usize {
        self.events
            .iter()
            .rev()
            .take_while(|event| !matches!(event, Event::BeginAnimation(..)))
            .filter(|event| matches!(event, Event::Extend(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl MapRenderer for RecordingRenderer {
    fn draw_routes(&mut self, routes: &[Route]) {
        self.events.push(Event::DrawRoutes(routes.len()));
    }

    fn clear_routes(&mut self) {
        self.events.push(Event::ClearRoutes);
    }

    fn set_route_style(&mut self, index: usize, style: LineStyle) {
        self.events.push(Event::Style(index, style));
    }

    fn hide_route(&mut self, index: usize) {
        self.events.push(Event::Hide(index));
    }

    fn show_route(&mut self, index: usize) {
        self.events.push(Event::Show(index));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.events.push(Event::Fit(bounds));
    }

    fn draw_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        self.events.push(Event::Marker(kind, at));
    }

    fn clear_marker(&mut self, kind: MarkerKind) {
        self.events.push(Event::ClearMarker(kind));
    }

    fn show_turns(&mut self, steps: &[TurnStep]) {
        self.events.push(Event::Turns(
            steps.iter().map(|step| step.instruction.clone()).collect(),
        ));
    }

    fn draw_search(&mut self, result: &SearchResult, visited: DisplayColor, best_path: LineStyle) {
        assert_eq!(visited, DisplayColor::VISITED);
        assert_eq!(best_path, LineStyle::best_path());
        self.events.push(Event::Search {
            visited: result.visited_order.len(),
            path: result.best_path.len(),
        });
    }

    fn clear_search(&mut self) {
        self.events.push(Event::ClearSearch);
    }

    fn begin_animation(&mut self, index: usize, style: LineStyle) {
        self.events.push(Event::BeginAnimation(index, style));
    }

    fn extend_animation(&mut self, point: Coordinate) {
        self.events.push(Event::Extend(point));
    }

    fn finish_animation(&mut self, index: usize) {
        self.events.push(Event::FinishAnimation(index));
    }

    fn cancel_animation(&mut self) {
        self.events.push(Event::CancelAnimation);
    }

    fn status(&mut self, message: &str) {
        self.events.push(Event::Status(message.to_string()));
    }
}
