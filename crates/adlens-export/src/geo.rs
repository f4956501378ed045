//! Region name to map coordinate lookup.
//!
//! Each region may carry a position on the 1000 x 500 bubble-map plane,
//! a latitude/longitude pair for the region-marker map, or both. Regions
//! missing from the table are dropped from map views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Equirectangular projection onto a `width` x `height` plane.
    #[must_use]
    pub fn project(self, width: f64, height: f64) -> Point {
        Point::new(
            (self.lng + 180.0) / 360.0 * width,
            (90.0 - self.lat) / 180.0 * height,
        )
    }
}

/// Known coordinates for one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Position on the bubble-map plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plane: Option<Point>,
    /// Geographic position for the region-marker map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_lng: Option<LatLng>,
}

/// Region name to [`Location`] lookup, matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoTable {
    locations: BTreeMap<String, Location>,
}

/// Built-in regions: `(name, plane x, plane y, lat, lng)`.
const BUILTIN: [(&str, f64, f64, f64, f64); 10] = [
    ("Dubai", 653.0, 226.0, 25.276_987, 55.296_249),
    ("Sharjah", 654.0, 225.0, 25.3463, 55.4209),
    ("Abu Dhabi", 651.0, 228.0, 24.4539, 54.3773),
    ("Riyadh", 630.0, 227.0, 24.7136, 46.6753),
    ("Jeddah", 609.0, 239.0, 21.4858, 39.1925),
    ("Dammam", 639.0, 223.0, 26.4207, 50.0888),
    ("Cairo", 586.0, 209.0, 30.0444, 31.2357),
    ("Alexandria", 583.0, 206.0, 31.2001, 29.9187),
    ("Istanbul", 580.0, 177.0, 41.0082, 28.9784),
    ("Ankara", 589.0, 181.0, 39.9334, 32.8597),
];

impl GeoTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled Gulf, Levant and Anatolia cities.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (name, x, y, lat, lng) in BUILTIN {
            table.insert(
                name,
                Location {
                    plane: Some(Point::new(x, y)),
                    lat_lng: Some(LatLng::new(lat, lng)),
                },
            );
        }
        table
    }

    /// Add or replace a region.
    pub fn insert(&mut self, region: impl Into<String>, location: Location) {
        self.locations.insert(region.into(), location);
    }

    #[must_use]
    pub fn get(&self, region: &str) -> Option<&Location> {
        self.locations.get(region)
    }

    /// Bubble-map plane position of `region`.
    #[must_use]
    pub fn plane(&self, region: &str) -> Option<Point> {
        self.get(region).and_then(|l| l.plane)
    }

    /// Latitude/longitude of `region`.
    #[must_use]
    pub fn lat_lng(&self, region: &str) -> Option<LatLng> {
        self.get(region).and_then(|l| l.lat_lng)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
