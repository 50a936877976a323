//! Output formatting for route results.
//!
//! In text mode the [`TerminalRenderer`] prints what a map would show as it
//! happens: route cards, turn list, search overlay and animation progress.
//! In JSON mode the renderer stays silent and a [`RouteReport`] is written to
//! stdout once the controller has settled.

use std::io::{self, Write};

use serde::Serialize;

use routeviz_lib::{
    ActiveRouteController, Bounds, Coordinate, DisplayColor, LineStyle, MapRenderer, MarkerKind,
    ProviderKind, Route, RouteVariant, SearchResult, TurnStep,
};

use crate::terminal::{format_km, format_minutes, ColorPalette};

/// Output format for the route command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, printed while the controller works.
    #[default]
    Text,
    /// One JSON document on stdout.
    Json,
}

/// [`MapRenderer`] that draws into the terminal.
#[derive(Debug)]
pub struct TerminalRenderer {
    format: OutputFormat,
    palette: ColorPalette,
    /// Variants of the drawn routes, by index.
    variants: Vec<RouteVariant>,
    animated_points: usize,
}

impl TerminalRenderer {
    pub fn new(format: OutputFormat, palette: ColorPalette) -> Self {
        Self {
            format,
            palette,
            variants: Vec::new(),
            animated_points: 0,
        }
    }

    fn enabled(&self) -> bool {
        self.format == OutputFormat::Text
    }

    fn label(&self, index: usize) -> String {
        let variant = self.variants.get(index).copied();
        match variant {
            Some(variant) => format!(
                "{}{:^10}{}",
                self.palette.tag(variant),
                variant.label(),
                self.palette.reset
            ),
            None => format!("route #{index}"),
        }
    }
}

impl MapRenderer for TerminalRenderer {
    fn draw_routes(&mut self, routes: &[Route]) {
        self.variants = routes.iter().map(|route| route.variant).collect();
        if !self.enabled() {
            return;
        }
        println!("Routes:");
        for (index, route) in routes.iter().enumerate() {
            let summary = route.summary();
            println!(
                "  {} Distance: {} • Time: {} {}({} vertices){}",
                self.label(index),
                format_km(summary.distance_meters),
                format_minutes(summary.duration_seconds),
                self.palette.gray,
                route.geometry().len(),
                self.palette.reset
            );
        }
    }

    fn clear_routes(&mut self) {
        self.variants.clear();
    }

    fn set_route_style(&mut self, index: usize, style: LineStyle) {
        if self.enabled() && style == LineStyle::active(style.color) {
            println!("\nActive route: {}", self.label(index));
        }
    }

    fn hide_route(&mut self, _index: usize) {}

    fn show_route(&mut self, _index: usize) {}

    fn fit_bounds(&mut self, bounds: Bounds) {
        if self.enabled() {
            println!(
                "{}Viewport: {} → {}{}",
                self.palette.gray, bounds.south_west, bounds.north_east, self.palette.reset
            );
        }
    }

    fn draw_marker(&mut self, kind: MarkerKind, at: Coordinate) {
        if !self.enabled() {
            return;
        }
        let name = match kind {
            MarkerKind::Start => "Start",
            MarkerKind::End => "End",
        };
        let color = self.palette.display(kind.color());
        println!("{color}●{} {name}: {at}", self.palette.reset);
    }

    fn clear_marker(&mut self, _kind: MarkerKind) {}

    fn show_turns(&mut self, steps: &[TurnStep]) {
        if !self.enabled() {
            return;
        }
        println!("Turns:");
        if steps.is_empty() {
            println!("  (no turn-by-turn guidance)");
        }
        for step in steps {
            println!(
                "  - {} {}• {}{}",
                step.instruction,
                self.palette.gray,
                format_km(step.distance_meters),
                self.palette.reset
            );
        }
    }

    fn draw_search(&mut self, result: &SearchResult, visited: DisplayColor, best_path: LineStyle) {
        if self.enabled() {
            println!(
                "{}Explored {} vertices{}; {}best path {} vertices, {}{}",
                self.palette.display(visited),
                result.visited_order.len(),
                self.palette.reset,
                self.palette.display(best_path.color),
                result.best_path.len(),
                format_km(result.total_distance_meters),
                self.palette.reset
            );
        }
    }

    fn clear_search(&mut self) {}

    fn begin_animation(&mut self, index: usize, _style: LineStyle) {
        self.animated_points = 0;
        if self.enabled() {
            eprint!("Drawing {} ", self.label(index));
        }
    }

    fn extend_animation(&mut self, _point: Coordinate) {
        self.animated_points += 1;
        if self.enabled() {
            eprint!(".");
            let _ = io::stderr().flush();
        }
    }

    fn finish_animation(&mut self, _index: usize) {
        if self.enabled() {
            eprintln!(" done ({} vertices)", self.animated_points);
        }
    }

    fn cancel_animation(&mut self) {
        if self.enabled() {
            eprintln!(" cancelled");
        }
    }

    fn status(&mut self, message: &str) {
        if self.enabled() {
            println!("{}{message}{}", self.palette.white_bold, self.palette.reset);
        }
    }
}

/// Machine-readable result of the route command.
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub start: Coordinate,
    pub end: Coordinate,
    pub source: ProviderKind,
    pub summary: String,
    pub active: RouteVariant,
    /// The variant Eco reuses.
    pub eco_source: RouteVariant,
    pub routes: Vec<RouteEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchEntry>,
}

#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub variant: RouteVariant,
    pub color: DisplayColor,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub vertices: usize,
    pub steps: Vec<TurnStep>,
}

#[derive(Debug, Serialize)]
pub struct SearchEntry {
    pub visited: usize,
    pub best_path: usize,
    pub total_distance_meters: f64,
}

impl RouteReport {
    /// Snapshot the controller, or `None` before any routes were computed.
    pub fn from_controller<R: MapRenderer>(controller: &ActiveRouteController<R>) -> Option<Self> {
        let set = controller.routes()?;
        let active = controller.active_route()?;
        let (Some(start), Some(end)) = controller.endpoints() else {
            return None;
        };

        let routes = set
            .routes()
            .iter()
            .map(|route| RouteEntry {
                variant: route.variant,
                color: route.color,
                distance_meters: route.summary().distance_meters,
                duration_seconds: route.summary().duration_seconds,
                vertices: route.geometry().len(),
                steps: route.steps().to_vec(),
            })
            .collect();
        let search = controller.last_search().map(|result| SearchEntry {
            visited: result.visited_order.len(),
            best_path: result.best_path.len(),
            total_distance_meters: result.total_distance_meters,
        });

        Some(Self {
            start,
            end,
            source: set.source(),
            summary: set.summary_line(),
            active: active.variant,
            eco_source: set.eco_source(),
            routes,
            search,
        })
    }
}

/// Write `report` as pretty JSON to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json(report: &RouteReport) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, report).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
