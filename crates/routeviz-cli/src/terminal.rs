//! Terminal styling and color utilities.
//!
//! Route variants are shown with ANSI colors close to their map colors.

use routeviz_lib::{DisplayColor, RouteVariant};

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bold reverse blue for the Fastest tag.
    pub const TAG_FASTEST: &str = "\x1b[1;7;34m";
    /// Bold reverse green for the Shortest tag.
    pub const TAG_SHORTEST: &str = "\x1b[1;7;32m";
    /// Bold reverse yellow for the Eco tag.
    pub const TAG_ECO: &str = "\x1b[1;7;33m";
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary text.
    pub const GRAY: &str = "\x1b[90m";
    /// Yellow for explored vertices.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for the best path and the end marker.
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_fastest: &'static str,
    pub tag_shortest: &'static str,
    pub tag_eco: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub green: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_fastest: colors::TAG_FASTEST,
            tag_shortest: colors::TAG_SHORTEST,
            tag_eco: colors::TAG_ECO,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            yellow: colors::YELLOW,
            red: colors::RED,
            green: colors::GREEN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_fastest: "",
            tag_shortest: "",
            tag_eco: "",
            white_bold: "",
            gray: "",
            yellow: "",
            red: "",
            green: "",
        }
    }

    /// Pick `colored()` or `plain()` from terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn tag(&self, variant: RouteVariant) -> &'static str {
        match variant {
            RouteVariant::Fastest => self.tag_fastest,
            RouteVariant::Shortest => self.tag_shortest,
            RouteVariant::Eco => self.tag_eco,
        }
    }

    /// ANSI code closest to a renderer color token.
    pub fn display(&self, color: DisplayColor) -> &'static str {
        match color {
            DisplayColor::START => self.green,
            DisplayColor::END | DisplayColor::BEST_PATH => self.red,
            DisplayColor::VISITED => self.yellow,
            DisplayColor::FASTEST => self.tag_fastest,
            DisplayColor::SHORTEST => self.tag_shortest,
            DisplayColor::ECO => self.tag_eco,
            _ => self.reset,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a distance in meters as kilometers with two decimals.
#[must_use]
pub fn format_km(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// Format a duration in seconds as minutes with one decimal.
#[must_use]
pub fn format_minutes(seconds: f64) -> String {
    format!("{:.1} min", seconds / 60.0)
}
