//! Place lookup collaborator.
//!
//! Only the literal `"lat, lon"` form is understood here; network geocoders
//! plug in behind the same [`Geocoder`] trait.

use std::future::Future;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Resolves free text to a coordinate.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, text: &str) -> impl Future<Output = Result<Coordinate>> + Send;
}

/// Geocoder that accepts coordinate literals only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralGeocoder;

impl Geocoder for LiteralGeocoder {
    async fn resolve(&self, text: &str) -> Result<Coordinate> {
        if !looks_like_literal(text) {
            return Err(Error::PlaceNotFound {
                query: text.trim().to_string(),
            });
        }
        parse_coordinate_literal(text)
    }
}

/// Parse `"lat, lon"` (comma and/or whitespace separated, latitude first).
pub fn parse_coordinate_literal(input: &str) -> Result<Coordinate> {
    let invalid = |reason: &str| Error::InvalidCoordinate {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [lat, lon] = parts.as_slice() else {
        return Err(invalid("expected \"lat, lon\""));
    };

    let lat: f64 = lat.parse().map_err(|_| invalid("latitude is not a number"))?;
    let lon: f64 = lon.parse().map_err(|_| invalid("longitude is not a number"))?;
    let coordinate = Coordinate::new(lon, lat);
    if !coordinate.is_valid() {
        return Err(invalid("latitude must be within ±90 and longitude within ±180"));
    }
    Ok(coordinate)
}

fn looks_like_literal(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | ' ' | '\t'))
}
