//! Rendering collaborator consumed by the controller.
//!
//! The engine never draws anything itself. A host (a map widget, a terminal,
//! a test recorder) implements [`MapRenderer`] and receives geometry plus
//! style tokens. Calls are synchronous and must not block for long; the
//! controller invokes them with the renderer lock held.

use crate::geo::{Bounds, Coordinate};
use crate::route::{DisplayColor, Route, RouteVariant, TurnStep};
use crate::search::SearchResult;

/// Default polyline weight of a route overlay.
pub const BASE_WEIGHT: f64 = 4.0;
/// Eco overlays are drawn thicker so they stay visible when aliased.
pub const ECO_WEIGHT: f64 = 6.0;
pub const BASE_OPACITY: f64 = 0.95;
pub const ACTIVE_WEIGHT: f64 = 8.0;
pub const ACTIVE_OPACITY: f64 = 1.0;
pub const INACTIVE_WEIGHT: f64 = 4.0;
pub const INACTIVE_OPACITY: f64 = 0.5;
pub const BEST_PATH_WEIGHT: f64 = 5.0;

/// Visual style of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: DisplayColor,
    pub weight: f64,
    pub opacity: f64,
}

impl LineStyle {
    /// Style a route gets when first drawn.
    pub fn base(route: &Route) -> Self {
        let weight = match route.variant {
            RouteVariant::Eco => ECO_WEIGHT,
            _ => BASE_WEIGHT,
        };
        Self {
            color: route.color,
            weight,
            opacity: BASE_OPACITY,
        }
    }

    pub fn active(color: DisplayColor) -> Self {
        Self {
            color,
            weight: ACTIVE_WEIGHT,
            opacity: ACTIVE_OPACITY,
        }
    }

    pub fn inactive(color: DisplayColor) -> Self {
        Self {
            color,
            weight: INACTIVE_WEIGHT,
            opacity: INACTIVE_OPACITY,
        }
    }

    /// Style of the progressively drawn line for a route with `self` style.
    pub fn animated(self) -> Self {
        Self {
            weight: self.weight + 1.0,
            opacity: ACTIVE_OPACITY,
            ..self
        }
    }

    pub fn best_path() -> Self {
        Self {
            color: DisplayColor::BEST_PATH,
            weight: BEST_PATH_WEIGHT,
            opacity: ACTIVE_OPACITY,
        }
    }
}

/// Point markers the engine asks the host to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn color(self) -> DisplayColor {
        match self {
            MarkerKind::Start => DisplayColor::START,
            MarkerKind::End => DisplayColor::END,
        }
    }
}

/// Map/rendering surface driven by the controller.
pub trait MapRenderer: Send + 'static {
    /// Draw every route of a freshly computed set, replacing previous lines.
    fn draw_routes(&mut self, routes: &[Route]);

    /// Remove every route line.
    fn clear_routes(&mut self);

    /// Restyle the route line at `index`.
    fn set_route_style(&mut self, index: usize, style: LineStyle);

    /// Hide the route line at `index` so an animation can redraw it.
    fn hide_route(&mut self, index: usize);

    /// Show the route line at `index` again after an aborted animation.
    fn show_route(&mut self, index: usize);

    fn fit_bounds(&mut self, bounds: Bounds);

    fn draw_marker(&mut self, kind: MarkerKind, at: Coordinate);

    fn clear_marker(&mut self, kind: MarkerKind);

    /// Replace the turn list.
    fn show_turns(&mut self, steps: &[TurnStep]);

    /// Draw the explored-vertex markers and the best-path line, replacing
    /// any previous search overlay.
    fn draw_search(&mut self, result: &SearchResult, visited: DisplayColor, best_path: LineStyle);

    fn clear_search(&mut self);

    /// Start an empty animated line for route `index`.
    fn begin_animation(&mut self, index: usize, style: LineStyle);

    /// Append one vertex to the animated line.
    fn extend_animation(&mut self, point: Coordinate);

    /// The animated line is complete and replaces route `index`.
    fn finish_animation(&mut self, index: usize);

    /// Remove a partially drawn animated line.
    fn cancel_animation(&mut self);

    /// Show a transient status message.
    fn status(&mut self, message: &str);
}
