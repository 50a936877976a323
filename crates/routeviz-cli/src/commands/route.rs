//! Route command handler: resolve endpoints, fetch the route set, and drive
//! the active-route controller against the terminal renderer.

use std::time::Duration;

use anyhow::{Context, Result};

use routeviz_lib::{
    ActiveRouteController, DefaultResolver, EngineConfig, Geocoder, LiteralGeocoder, RouteVariant,
};

use routeviz_cli::output::{render_json, OutputFormat, RouteReport, TerminalRenderer};
use routeviz_cli::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Start as "lat, lon".
    pub from: String,
    /// Destination as "lat, lon".
    pub to: String,
    /// Route made active after computing.
    pub select: RouteVariant,
    pub animate: bool,
    pub speed: Option<u32>,
    /// `false` when `--no-search` was passed.
    pub show_search: bool,
    pub format: OutputFormat,
    pub ors_api_key: Option<String>,
    pub ors_url: Option<String>,
    pub osrm_url: Option<String>,
    pub no_fallback: bool,
    pub timeout_secs: Option<u64>,
}

impl RouteCommandArgs {
    /// Layer command-line overrides on top of the environment configuration.
    pub fn apply_to(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(key) = &self.ors_api_key {
            config = config.with_ors_api_key(key.clone());
        }
        if let Some(url) = &self.ors_url {
            config = config.with_ors_base_url(url.clone());
        }
        if self.no_fallback {
            config = config.with_osrm_base_url(None);
        } else if let Some(url) = &self.osrm_url {
            config = config.with_osrm_base_url(Some(url.clone()));
        }
        if let Some(secs) = self.timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_http_timeout(Duration::from_secs(secs));
        }

        let mut options = config.controller;
        options = options
            .with_animation(options.animate || self.animate)
            .with_search(options.show_search && self.show_search);
        if let Some(speed) = self.speed {
            options = options.with_speed(speed);
        }
        config.with_controller(options)
    }
}

/// Handle the route subcommand.
pub async fn handle_route_command(args: &RouteCommandArgs) -> Result<()> {
    let geocoder = LiteralGeocoder;
    let start = geocoder
        .resolve(&args.from)
        .await
        .with_context(|| format!("failed to resolve start '{}'", args.from))?;
    let end = geocoder
        .resolve(&args.to)
        .await
        .with_context(|| format!("failed to resolve destination '{}'", args.to))?;

    let config = args.apply_to(EngineConfig::from_env());
    tracing::debug!(
        ors_key = config.ors_api_key.is_some(),
        fallback = config.osrm_base_url.is_some(),
        timeout_secs = config.http_timeout.as_secs(),
        "routing configuration"
    );
    let resolver =
        DefaultResolver::from_config(&config).context("failed to build the routing providers")?;

    let palette = match args.format {
        OutputFormat::Text => ColorPalette::detect(),
        OutputFormat::Json => ColorPalette::plain(),
    };
    let mut controller = ActiveRouteController::new(
        TerminalRenderer::new(args.format, palette),
        config.controller,
    );
    controller.set_start(start);
    controller.set_end(end);

    // Computing activates the first route; only animate it when it is the one asked for.
    let animate = controller.options().animate;
    let index = args.select.index();
    controller.set_animation(animate && index == 0);
    controller
        .compute(&resolver)
        .await
        .context("failed to fetch routes")?;
    if index != 0 {
        controller.set_animation(animate);
        controller.select(index)?;
    }
    controller.wait_for_animation().await;

    if args.format == OutputFormat::Json {
        let report =
            RouteReport::from_controller(&controller).context("no routes were computed")?;
        render_json(&report).context("failed to write JSON output")?;
    }

    Ok(())
}
