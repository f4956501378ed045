//! Bubble map geometry on the fixed 1000 x 500 plane.
//!
//! Radius and color scales are computed over every value in the series,
//! including regions the geo table cannot place. Unplaced regions are
//! then dropped and the remaining bubbles are ordered largest first so
//! smaller bubbles draw on top.

use serde::{Deserialize, Serialize};

use adlens_pipeline::ChartSeries;

use crate::color::{ColorScale, Rgb, palette};
use crate::format::ValueFormatter;
use crate::geo::GeoTable;
use crate::geometry::Point;
use crate::scale::{Extent, RadiusScale, Scale};

/// Bubble map layout and scale parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleMapConfig {
    pub width: f64,
    pub height: f64,
    pub low_color: Rgb,
    pub high_color: Rgb,
    pub base_radius: f64,
    pub radius_factor: f64,
    /// Radius used when all values are equal.
    pub fallback_radius: f64,
    pub fill_opacity: f64,
}

impl BubbleMapConfig {
    pub const DEFAULT_WIDTH: f64 = 1000.0;
    pub const DEFAULT_HEIGHT: f64 = 500.0;
    pub const DEFAULT_LOW_COLOR: Rgb = palette::BLUE;
    pub const DEFAULT_HIGH_COLOR: Rgb = palette::GREEN;
    pub const DEFAULT_BASE_RADIUS: f64 = 3.0;
    pub const DEFAULT_RADIUS_FACTOR: f64 = 20.0;
    pub const DEFAULT_FALLBACK_RADIUS: f64 = 8.0;
    pub const DEFAULT_FILL_OPACITY: f64 = 0.6;
}

impl Default for BubbleMapConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            low_color: Self::DEFAULT_LOW_COLOR,
            high_color: Self::DEFAULT_HIGH_COLOR,
            base_radius: Self::DEFAULT_BASE_RADIUS,
            radius_factor: Self::DEFAULT_RADIUS_FACTOR,
            fallback_radius: Self::DEFAULT_FALLBACK_RADIUS,
            fill_opacity: Self::DEFAULT_FILL_OPACITY,
        }
    }
}

/// One placed region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub region: String,
    pub value: f64,
    pub center: Point,
    pub radius: f64,
    pub color: Rgb,
    /// `"{region}: {value}"`.
    pub tooltip: String,
}

/// Bubble map output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BubbleMap {
    /// The input series was empty.
    NoData,
    /// Bubbles ordered by value, descending. May be empty when no region
    /// is in the geo table.
    Ready(Vec<Bubble>),
}

/// Place one bubble per mapped region in `series`.
///
/// # Examples
///
/// ```
/// use adlens_export::bubble::{BubbleMap, BubbleMapConfig, bubble_map};
/// use adlens_export::format::ValueFormat;
/// use adlens_export::geo::GeoTable;
/// use adlens_pipeline::{ChartSeries, SeriesPoint};
///
/// let series = ChartSeries::new(vec![
///     SeriesPoint::new("Cairo", 10.0),
///     SeriesPoint::new("Dubai", 50.0),
///     SeriesPoint::new("Riyadh", 20.0),
/// ]);
/// let map = bubble_map(&series, &GeoTable::builtin(), &BubbleMapConfig::default(), &ValueFormat::CurrencyWhole);
/// let BubbleMap::Ready(bubbles) = map else { unreachable!() };
/// let values: Vec<f64> = bubbles.iter().map(|b| b.value).collect();
/// assert_eq!(values, vec![50.0, 20.0, 10.0]);
/// ```
#[must_use]
pub fn bubble_map(
    series: &ChartSeries,
    geo: &GeoTable,
    config: &BubbleMapConfig,
    format: &impl ValueFormatter,
) -> BubbleMap {
    let Some(extent) = Extent::of(series.values()) else {
        return BubbleMap::NoData;
    };
    let radius = RadiusScale::new(
        extent,
        config.base_radius,
        config.radius_factor,
        config.fallback_radius,
    );
    let color = ColorScale::new(extent, config.low_color, config.high_color);

    let mut bubbles: Vec<Bubble> = series
        .points()
        .iter()
        .filter_map(|p| {
            let Some(center) = geo.plane(&p.label) else {
                tracing::trace!(region = %p.label, "region has no map position, dropped");
                return None;
            };
            Some(Bubble {
                region: p.label.clone(),
                value: p.value,
                center,
                radius: radius.scale(p.value),
                color: color.scale(p.value),
                tooltip: format!("{}: {}", p.label, format.format_value(p.value)),
            })
        })
        .collect();
    bubbles.sort_by(|a, b| b.value.total_cmp(&a.value));
    BubbleMap::Ready(bubbles)
}

#[cfg(test)]
mod tests {
    use adlens_pipeline::SeriesPoint;

    use super::*;
    use crate::format::ValueFormat;

    fn series(points: &[(&str, f64)]) -> ChartSeries {
        points
            .iter()
            .map(|&(l, v)| SeriesPoint::new(l, v))
            .collect()
    }

    fn draw(points: &[(&str, f64)]) -> BubbleMap {
        bubble_map(
            &series(points),
            &GeoTable::builtin(),
            &BubbleMapConfig::default(),
            &ValueFormat::CurrencyWhole,
        )
    }

    fn bubbles(map: BubbleMap) -> Vec<Bubble> {
        match map {
            BubbleMap::Ready(b) => b,
            BubbleMap::NoData => Vec::new(),
        }
    }

    #[test]
    fn empty_series_is_no_data() {
        assert_eq!(draw(&[]), BubbleMap::NoData);
    }

    #[test]
    fn ordered_by_value_descending() {
        let b = bubbles(draw(&[("Cairo", 10.0), ("Dubai", 50.0), ("Riyadh", 20.0)]));
        let regions: Vec<&str> = b.iter().map(|b| b.region.as_str()).collect();
        assert_eq!(regions, vec!["Dubai", "Riyadh", "Cairo"]);
    }

    #[test]
    fn extremes_get_endpoint_colors() {
        let b = bubbles(draw(&[("Cairo", 10.0), ("Riyadh", 20.0), ("Dubai", 30.0)]));
        assert_eq!(b[0].color, palette::GREEN);
        assert_eq!(b[2].color, palette::BLUE);
        assert_eq!(b[1].color, palette::BLUE.blend(palette::GREEN, 0.5));
    }

    #[test]
    fn equal_values_use_fallbacks() {
        let b = bubbles(draw(&[("Cairo", 5.0), ("Riyadh", 5.0), ("Dubai", 5.0)]));
        assert_eq!(b.len(), 3);
        for bubble in &b {
            assert!((bubble.radius - 8.0).abs() < f64::EPSILON);
            assert_eq!(bubble.color, palette::GREEN);
        }
    }

    #[test]
    fn unmapped_regions_dropped_but_still_scale() {
        let b = bubbles(draw(&[("Atlantis", 100.0), ("Dubai", 50.0), ("Cairo", 0.0)]));
        assert_eq!(b.len(), 2);
        // Dubai sits halfway because Atlantis set the maximum.
        assert_eq!(b[0].color, palette::BLUE.blend(palette::GREEN, 0.5));
        assert!((b[0].radius - 20.0f64.mul_add(1.5f64.ln(), 3.0)).abs() < 1e-9);
        assert!((b[1].radius - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_mapped_is_ready_but_empty() {
        assert_eq!(draw(&[("Atlantis", 1.0)]), BubbleMap::Ready(Vec::new()));
    }

    #[test]
    fn tooltip_and_position() {
        let b = bubbles(draw(&[("Dubai", 1234.5), ("Cairo", 1.0)]));
        assert_eq!(b[0].tooltip, "Dubai: $1,235");
        assert_eq!(b[0].center, Point::new(653.0, 226.0));
    }
}
