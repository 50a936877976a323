//! Active-route state machine.
//!
//! [`ActiveRouteController`] owns the current [`RouteSet`], keeps exactly one
//! route active and drives the [`MapRenderer`]: route emphasis, viewport fit,
//! turn list, search overlays and the progressive line animation.
//!
//! Two generation counters keep asynchronous work honest:
//! - every compute takes a [`ComputeTicket`]; completions carrying an older
//!   ticket are discarded so a slow request can never replace a newer set;
//! - every animation captures the animation generation and checks it under
//!   the renderer lock before each draw, so an invalidated animation stops
//!   drawing even before its task is aborted.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ControllerOptions;
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::provider::{FallbackProvider, PrimaryProvider};
use crate::render::{LineStyle, MapRenderer, MarkerKind};
use crate::resolver::ProviderResolver;
use crate::route::{DisplayColor, Route};
use crate::route_set::RouteSet;
use crate::search::{search, SearchResult};

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No route set yet.
    Idle,
    /// A route set exists and one route is active.
    RoutesReady,
    /// The active route is being drawn progressively.
    Animating,
}

/// The active route index and whether it is currently animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSelection {
    pub index: usize,
    pub animating: bool,
}

/// Identifies one route computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputeTicket {
    generation: u64,
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
}

impl ComputeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a finished computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeOutcome {
    /// The route set replaced the previous one.
    Applied,
    /// A newer computation was started meanwhile; the result was dropped.
    Stale,
}

struct Animation {
    task: JoinHandle<()>,
    index: usize,
    finished: Arc<AtomicBool>,
}

/// Drives route selection and rendering for one map.
pub struct ActiveRouteController<R> {
    renderer: Arc<Mutex<R>>,
    options: ControllerOptions,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
    routes: Option<RouteSet>,
    active: usize,
    last_search: Option<SearchResult>,
    compute_generation: u64,
    animation_generation: Arc<AtomicU64>,
    animation: Option<Animation>,
}

impl<R: MapRenderer> ActiveRouteController<R> {
    pub fn new(renderer: R, options: ControllerOptions) -> Self {
        Self::with_shared_renderer(Arc::new(Mutex::new(renderer)), options)
    }

    /// Build a controller around a renderer the caller keeps a handle to.
    pub fn with_shared_renderer(renderer: Arc<Mutex<R>>, options: ControllerOptions) -> Self {
        Self {
            renderer,
            options,
            start: None,
            end: None,
            routes: None,
            active: 0,
            last_search: None,
            compute_generation: 0,
            animation_generation: Arc::new(AtomicU64::new(0)),
            animation: None,
        }
    }

    pub fn renderer(&self) -> &Arc<Mutex<R>> {
        &self.renderer
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    pub fn state(&self) -> ControllerState {
        match (&self.routes, self.is_animating()) {
            (None, _) => ControllerState::Idle,
            (Some(_), true) => ControllerState::Animating,
            (Some(_), false) => ControllerState::RoutesReady,
        }
    }

    pub fn selection(&self) -> Option<ActiveSelection> {
        self.routes.as_ref().map(|_| ActiveSelection {
            index: self.active,
            animating: self.is_animating(),
        })
    }

    pub fn routes(&self) -> Option<&RouteSet> {
        self.routes.as_ref()
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.routes.as_ref().and_then(|set| set.get(self.active))
    }

    /// Search result of the active route, when overlays are enabled.
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last_search.as_ref()
    }

    pub fn endpoints(&self) -> (Option<Coordinate>, Option<Coordinate>) {
        (self.start, self.end)
    }

    pub fn set_start(&mut self, at: Coordinate) {
        self.start = Some(at);
        lock(&self.renderer).draw_marker(MarkerKind::Start, at);
        tracing::debug!(start = %at, "start set");
    }

    pub fn set_end(&mut self, at: Coordinate) {
        self.end = Some(at);
        lock(&self.renderer).draw_marker(MarkerKind::End, at);
        tracing::debug!(end = %at, "end set");
    }

    pub fn set_animation(&mut self, animate: bool) {
        self.options.animate = animate;
    }

    pub fn set_animation_speed(&mut self, speed: u32) {
        self.options = self.options.with_speed(speed);
    }

    /// Toggle the search overlay and redraw it for the active route.
    pub fn set_show_search(&mut self, show_search: bool) {
        self.options.show_search = show_search;
        if let Some(route) = self.active_route().cloned() {
            self.refresh_search(&route);
        }
    }

    /// Start a computation for the current endpoints. Any older computation
    /// still in flight becomes stale.
    pub fn begin_compute(&mut self) -> ComputeTicket {
        self.compute_generation += 1;
        ComputeTicket {
            generation: self.compute_generation,
            start: self.start,
            end: self.end,
        }
    }

    /// Apply the result of the computation identified by `ticket`.
    ///
    /// Failures keep the previous route set and are reported through the
    /// renderer status line before being returned.
    pub fn apply_compute(
        &mut self,
        ticket: ComputeTicket,
        result: Result<RouteSet>,
    ) -> Result<ComputeOutcome> {
        if ticket.generation != self.compute_generation {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.compute_generation,
                "discarding stale route computation"
            );
            return Ok(ComputeOutcome::Stale);
        }

        let set = match result {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(error = %err, "route computation failed");
                lock(&self.renderer).status(&format!("Routing failed: {err}"));
                return Err(err);
            }
        };

        self.cancel_animation();
        {
            let mut renderer = lock(&self.renderer);
            renderer.draw_routes(set.routes());
            for (index, route) in set.routes().iter().enumerate() {
                renderer.set_route_style(index, LineStyle::base(route));
            }
            renderer.status(&set.summary_line());
        }
        tracing::info!(
            generation = ticket.generation,
            source = ?set.source(),
            "routes loaded"
        );
        self.routes = Some(set);
        self.activate(0)?;
        Ok(ComputeOutcome::Applied)
    }

    /// Compute routes for the current endpoints and make the Fastest active.
    pub async fn compute<P, F>(
        &mut self,
        resolver: &ProviderResolver<P, F>,
    ) -> Result<ComputeOutcome>
    where
        P: PrimaryProvider,
        F: FallbackProvider,
    {
        let ticket = self.begin_compute();
        lock(&self.renderer).status("Requesting routes...");
        let result = RouteSet::compute(resolver, ticket.start, ticket.end).await;
        self.apply_compute(ticket, result)
    }

    /// Make route `index` active.
    ///
    /// Reselecting the active route only restarts the animation, and only
    /// when animation is enabled.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.routes.as_ref().ok_or(Error::NoRoutes)?.len();
        if index >= len {
            return Err(Error::InvalidSelection { index, len });
        }

        if index == self.active {
            if self.options.animate {
                self.start_animation();
            }
            return Ok(());
        }

        self.activate(index)
    }

    /// Clear endpoints, routes and overlays and return to `Idle`.
    pub fn reset(&mut self) {
        self.cancel_animation();
        // In-flight computations must not resurrect cleared routes.
        self.compute_generation += 1;
        self.start = None;
        self.end = None;
        self.routes = None;
        self.active = 0;
        self.last_search = None;

        let mut renderer = lock(&self.renderer);
        renderer.clear_search();
        renderer.clear_routes();
        renderer.clear_marker(MarkerKind::Start);
        renderer.clear_marker(MarkerKind::End);
        renderer.show_turns(&[]);
        renderer.status("Cleared");
        drop(renderer);
        tracing::info!("controller reset");
    }

    /// Wait until the running animation, if any, has finished drawing.
    pub async fn wait_for_animation(&mut self) {
        // A join handle must not be polled again once it has completed.
        if let Some(animation) = self.animation.take() {
            if let Err(err) = animation.task.await {
                if err.is_panic() {
                    tracing::warn!(error = %err, "animation task panicked");
                }
            }
        }
    }

    fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|animation| !animation.finished.load(Ordering::SeqCst))
    }

    fn activate(&mut self, index: usize) -> Result<()> {
        let route = self
            .routes
            .as_ref()
            .and_then(|set| set.get(index))
            .cloned()
            .ok_or(Error::NoRoutes)?;

        self.cancel_animation();
        self.active = index;

        if let Some(set) = &self.routes {
            let mut renderer = lock(&self.renderer);
            for (position, other) in set.routes().iter().enumerate() {
                let style = if position == index {
                    LineStyle::active(other.color)
                } else {
                    LineStyle::inactive(other.color)
                };
                renderer.set_route_style(position, style);
            }
            renderer.fit_bounds(route.geometry().bounds());
            renderer.show_turns(route.steps());
        }
        tracing::info!(index, variant = %route.variant, "route selected");

        self.refresh_search(&route);
        if self.options.animate {
            self.start_animation();
        }
        Ok(())
    }

    fn refresh_search(&mut self, route: &Route) {
        let mut renderer = lock(&self.renderer);
        renderer.clear_search();
        if !self.options.show_search {
            self.last_search = None;
            return;
        }

        let result = search(route.geometry());
        if !result.is_empty() {
            renderer.draw_search(&result, DisplayColor::VISITED, LineStyle::best_path());
        }
        tracing::debug!(
            visited = result.visited_order.len(),
            path = result.best_path.len(),
            "search overlay refreshed"
        );
        self.last_search = Some(result);
    }

    fn start_animation(&mut self) {
        self.cancel_animation();

        let Some(route) = self.active_route() else {
            return;
        };
        if !route.geometry().is_renderable() {
            tracing::debug!(
                vertices = route.geometry().len(),
                "route too short to animate"
            );
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime available; animation skipped");
            return;
        };

        let index = self.active;
        let points = route.geometry().points().to_vec();
        let style = LineStyle::active(route.color).animated();
        let interval = self.options.animation_interval();

        let generation = self.animation_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut renderer = lock(&self.renderer);
            renderer.hide_route(index);
            renderer.begin_animation(index, style);
        }

        let finished = Arc::new(AtomicBool::new(false));
        let task = runtime.spawn(animate(
            Arc::clone(&self.renderer),
            Arc::clone(&self.animation_generation),
            generation,
            index,
            points,
            interval,
            Arc::clone(&finished),
        ));
        tracing::debug!(index, generation, ?interval, "animation started");

        self.animation = Some(Animation {
            task,
            index,
            finished,
        });
    }

    fn cancel_animation(&mut self) {
        let Some(animation) = self.animation.take() else {
            return;
        };

        {
            let mut renderer = lock(&self.renderer);
            // Bumped under the lock so the task cannot draw after this point.
            self.animation_generation.fetch_add(1, Ordering::SeqCst);
            if !animation.finished.load(Ordering::SeqCst) {
                renderer.cancel_animation();
                renderer.show_route(animation.index);
            }
        }
        animation.task.abort();
    }
}

impl<R> Drop for ActiveRouteController<R> {
    fn drop(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.task.abort();
        }
    }
}

async fn animate<R: MapRenderer>(
    renderer: Arc<Mutex<R>>,
    generation: Arc<AtomicU64>,
    expected: u64,
    index: usize,
    points: Vec<Coordinate>,
    interval: Duration,
    finished: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    for point in points {
        ticker.tick().await;
        if !draw_step(&renderer, &generation, expected, |r| r.extend_animation(point)) {
            return;
        }
    }

    let completed = draw_step(&renderer, &generation, expected, |r| {
        r.finish_animation(index);
        finished.store(true, Ordering::SeqCst);
    });
    if completed {
        tracing::debug!(index, generation = expected, "animation finished");
    }
}

/// Run `draw` if the animation generation is still `expected`.
fn draw_step<R>(
    renderer: &Mutex<R>,
    generation: &AtomicU64,
    expected: u64,
    draw: impl FnOnce(&mut R),
) -> bool {
    let mut guard = lock(renderer);
    if generation.load(Ordering::SeqCst) != expected {
        return false;
    }
    draw(&mut guard);
    true
}

fn lock<R>(renderer: &Mutex<R>) -> MutexGuard<'_, R> {
    renderer.lock().unwrap_or_else(PoisonError::into_inner)
}
