//! Latitude/longitude region markers for the tiled region map.
//!
//! Unlike the bubble map, regions without coordinates are removed
//! *before* the value range is taken, and color is a two-step threshold
//! rather than a gradient.

use serde::{Deserialize, Serialize};

use adlens_pipeline::ChartSeries;

use crate::color::{Rgb, palette};
use crate::format::ValueFormatter;
use crate::geo::{GeoTable, LatLng};
use crate::scale::Extent;

/// Region map appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionMapConfig {
    /// Initial map center.
    pub center: LatLng,
    /// Initial tile zoom level.
    pub zoom: u8,
    pub high_color: Rgb,
    pub low_color: Rgb,
    pub base_radius: f64,
    pub radius_factor: f64,
    /// Normalized value above which a marker takes `high_color`.
    pub threshold: f64,
    pub fill_opacity: f64,
    /// Size of the projected plane used for SVG output.
    pub width: f64,
    pub height: f64,
}

impl RegionMapConfig {
    pub const DEFAULT_CENTER: LatLng = LatLng::new(25.0, 45.0);
    pub const DEFAULT_ZOOM: u8 = 4;
    pub const DEFAULT_BASE_RADIUS: f64 = 10.0;
    pub const DEFAULT_RADIUS_FACTOR: f64 = 20.0;
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const DEFAULT_FILL_OPACITY: f64 = 0.7;
    pub const DEFAULT_WIDTH: f64 = 1000.0;
    pub const DEFAULT_HEIGHT: f64 = 500.0;

    /// Revenue map: green above the threshold, amber below.
    #[must_use]
    pub fn revenue() -> Self {
        Self::default()
    }

    /// Spend map: blue above the threshold, pink below.
    #[must_use]
    pub fn spend() -> Self {
        Self {
            high_color: palette::BLUE,
            low_color: palette::PINK,
            ..Self::default()
        }
    }
}

impl Default for RegionMapConfig {
    fn default() -> Self {
        Self {
            center: Self::DEFAULT_CENTER,
            zoom: Self::DEFAULT_ZOOM,
            high_color: palette::GREEN,
            low_color: palette::AMBER,
            base_radius: Self::DEFAULT_BASE_RADIUS,
            radius_factor: Self::DEFAULT_RADIUS_FACTOR,
            threshold: Self::DEFAULT_THRESHOLD,
            fill_opacity: Self::DEFAULT_FILL_OPACITY,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// One region marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMarker {
    pub region: String,
    pub value: f64,
    pub position: LatLng,
    pub radius: f64,
    pub color: Rgb,
    /// Formatted value shown under the region name.
    pub value_label: String,
}

/// Region map output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RegionMap {
    /// The input series was empty.
    NoData,
    Ready {
        center: LatLng,
        zoom: u8,
        /// Markers in series order. May be empty when no region is in
        /// the geo table.
        markers: Vec<RegionMarker>,
    },
}

/// Build one marker per region with known coordinates.
///
/// Radius is `base + value / max * factor`, or `base` when the maximum
/// is not positive. The normalized value divides by one when every
/// value is equal.
#[must_use]
pub fn region_markers(
    series: &ChartSeries,
    geo: &GeoTable,
    config: &RegionMapConfig,
    format: &impl ValueFormatter,
) -> RegionMap {
    if series.is_empty() {
        return RegionMap::NoData;
    }

    let placed: Vec<_> = series
        .points()
        .iter()
        .filter_map(|p| {
            let position = geo.lat_lng(&p.label);
            if position.is_none() {
                tracing::trace!(region = %p.label, "region has no coordinates, dropped");
            }
            position.map(|pos| (p, pos))
        })
        .collect();

    let markers = Extent::of(placed.iter().map(|(p, _)| p.value)).map_or_else(Vec::new, |extent| {
        let span = if extent.is_degenerate() { 1.0 } else { extent.span() };
        placed
            .iter()
            .map(|&(p, position)| {
                let ratio = (p.value - extent.min) / span;
                let radius = if extent.max > 0.0 {
                    (p.value / extent.max).mul_add(config.radius_factor, config.base_radius)
                } else {
                    config.base_radius
                };
                RegionMarker {
                    region: p.label.clone(),
                    value: p.value,
                    position,
                    radius,
                    color: if ratio > config.threshold {
                        config.high_color
                    } else {
                        config.low_color
                    },
                    value_label: format.format_value(p.value),
                }
            })
            .collect()
    });

    RegionMap::Ready {
        center: config.center,
        zoom: config.zoom,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use adlens_pipeline::SeriesPoint;

    use super::*;
    use crate::format::ValueFormat;

    fn draw(points: &[(&str, f64)], config: &RegionMapConfig) -> Vec<RegionMarker> {
        let series: ChartSeries = points.iter().map(|&(l, v)| SeriesPoint::new(l, v)).collect();
        match region_markers(&series, &GeoTable::builtin(), config, &ValueFormat::CurrencyWhole) {
            RegionMap::Ready { markers, .. } => markers,
            RegionMap::NoData => Vec::new(),
        }
    }

    #[test]
    fn empty_series_is_no_data() {
        let map = region_markers(
            &ChartSeries::default(),
            &GeoTable::builtin(),
            &RegionMapConfig::default(),
            &ValueFormat::CurrencyWhole,
        );
        assert_eq!(map, RegionMap::NoData);
    }

    #[test]
    fn threshold_colors_and_linear_radius() {
        let m = draw(
            &[("Dubai", 100.0), ("Cairo", 0.0), ("Riyadh", 50.0), ("Jeddah", 51.0)],
            &RegionMapConfig::revenue(),
        );
        assert_eq!(m[0].color, palette::GREEN);
        assert_eq!(m[1].color, palette::AMBER);
        // Exactly at the threshold stays low.
        assert_eq!(m[2].color, palette::AMBER);
        assert_eq!(m[3].color, palette::GREEN);
        assert!((m[0].radius - 30.0).abs() < 1e-9);
        assert!((m[1].radius - 10.0).abs() < 1e-9);
        assert!((m[2].radius - 20.0).abs() < 1e-9);
    }

    #[test]
    fn range_ignores_unmapped_regions() {
        let m = draw(&[("Atlantis", 1000.0), ("Dubai", 40.0), ("Cairo", 20.0)], &RegionMapConfig::spend());
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].color, palette::BLUE);
        assert_eq!(m[1].color, palette::PINK);
        assert!((m[0].radius - 30.0).abs() < 1e-9);
    }

    #[test]
    fn equal_values_are_low_and_guarded() {
        let m = draw(&[("Dubai", 5.0), ("Cairo", 5.0)], &RegionMapConfig::default());
        assert!(m.iter().all(|mk| mk.color == palette::AMBER));
        assert!(m.iter().all(|mk| (mk.radius - 30.0).abs() < 1e-9));
    }

    #[test]
    fn non_positive_max_uses_base_radius() {
        let m = draw(&[("Dubai", 0.0), ("Cairo", -5.0)], &RegionMapConfig::default());
        assert!(m.iter().all(|mk| (mk.radius - 10.0).abs() < f64::EPSILON));
        assert!(m.iter().all(|mk| mk.radius.is_finite()));
    }

    #[test]
    fn markers_keep_series_order_and_labels() {
        let m = draw(&[("Cairo", 1.0), ("Dubai", 2000.0)], &RegionMapConfig::default());
        assert_eq!(m[0].region, "Cairo");
        assert_eq!(m[1].value_label, "$2,000");
        assert_eq!(m[1].position, LatLng::new(25.276_987, 55.296_249));
    }
}
