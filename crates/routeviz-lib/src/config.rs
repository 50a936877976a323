//! Engine configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `ROUTEVIZ_ORS_API_KEY` (or `ORS_API_KEY`): OpenRouteService API key
//! - `ROUTEVIZ_ORS_BASE_URL`: ORS endpoint (default: public API)
//! - `ROUTEVIZ_OSRM_BASE_URL`: OSRM endpoint (default: public demo server)
//! - `ROUTEVIZ_OSRM_DISABLED`: `1`/`true` removes the fallback provider
//! - `ROUTEVIZ_HTTP_TIMEOUT_SECS`: request timeout (default: 15)
//! - `ROUTEVIZ_ANIMATE`: animate selections (default: off)
//! - `ROUTEVIZ_ANIMATION_SPEED`: 0..=195 (default: 60)
//! - `ROUTEVIZ_SHOW_SEARCH`: draw search overlays (default: on)

use std::time::Duration;

use crate::provider::{DEFAULT_ORS_BASE_URL, DEFAULT_OSRM_BASE_URL};

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_ANIMATION_SPEED: u32 = 60;
pub const MAX_ANIMATION_SPEED: u32 = 195;

/// Slowest step interval; speed is subtracted from this.
const ANIMATION_BASE_MS: u64 = 200;
const MIN_ANIMATION_INTERVAL_MS: u64 = 5;

/// Interval between animated vertices for `speed`. Higher is faster.
pub fn animation_interval(speed: u32) -> Duration {
    let millis = ANIMATION_BASE_MS
        .saturating_sub(u64::from(speed))
        .max(MIN_ANIMATION_INTERVAL_MS);
    Duration::from_millis(millis)
}

/// Behaviour toggles of the active-route controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub animate: bool,
    pub animation_speed: u32,
    pub show_search: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            animate: false,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            show_search: true,
        }
    }
}

impl ControllerOptions {
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.animation_speed = speed.min(MAX_ANIMATION_SPEED);
        self
    }

    pub fn with_search(mut self, show_search: bool) -> Self {
        self.show_search = show_search;
        self
    }

    pub fn animation_interval(&self) -> Duration {
        animation_interval(self.animation_speed)
    }
}

/// Provider endpoints, credentials and controller defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    /// `None` disables the fallback provider.
    pub osrm_base_url: Option<String>,
    pub http_timeout: Duration,
    pub controller: ControllerOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ors_api_key: None,
            ors_base_url: DEFAULT_ORS_BASE_URL.to_string(),
            osrm_base_url: Some(DEFAULT_OSRM_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            controller: ControllerOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values are
    /// treated as unset; unparsable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let ors_api_key = get("ROUTEVIZ_ORS_API_KEY").or_else(|| get("ORS_API_KEY"));
        let ors_base_url = get("ROUTEVIZ_ORS_BASE_URL").unwrap_or(defaults.ors_base_url);
        let osrm_base_url = if get("ROUTEVIZ_OSRM_DISABLED").is_some_and(|v| parse_flag(&v)) {
            None
        } else {
            get("ROUTEVIZ_OSRM_BASE_URL").or(defaults.osrm_base_url)
        };
        let http_timeout = get("ROUTEVIZ_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        let controller = ControllerOptions::default()
            .with_animation(get("ROUTEVIZ_ANIMATE").is_some_and(|v| parse_flag(&v)))
            .with_speed(
                get("ROUTEVIZ_ANIMATION_SPEED")
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(DEFAULT_ANIMATION_SPEED),
            )
            .with_search(get("ROUTEVIZ_SHOW_SEARCH").map_or(true, |v| parse_flag(&v)));

        Self {
            ors_api_key,
            ors_base_url,
            osrm_base_url,
            http_timeout,
            controller,
        }
    }

    pub fn with_ors_api_key(mut self, key: impl Into<String>) -> Self {
        self.ors_api_key = Some(key.into());
        self
    }

    pub fn with_ors_base_url(mut self, url: impl Into<String>) -> Self {
        self.ors_base_url = url.into();
        self
    }

    pub fn with_osrm_base_url(mut self, url: Option<String>) -> Self {
        self.osrm_base_url = url;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_controller(mut self, controller: ControllerOptions) -> Self {
        self.controller = controller;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
