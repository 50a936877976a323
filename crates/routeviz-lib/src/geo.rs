//! WGS-84 coordinates, great-circle distance, and bounding boxes.

use std::fmt;

use serde::Serialize;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS-84 position in degrees. Longitude always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine(*self, *other)
    }

    /// Whether both components are finite and within WGS-84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Displayed the way people type them: latitude first.
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let s = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `s` a hair above 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_METERS * s.sqrt().min(1.0).asin()
}

/// Axis-aligned bounding box used to fit the viewport to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for point in &points[1..] {
            bounds.south_west.lon = bounds.south_west.lon.min(point.lon);
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.north_east.lon = bounds.north_east.lon.max(point.lon);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south_west.lon..=self.north_east.lon).contains(&point.lon)
            && (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
    }
}
