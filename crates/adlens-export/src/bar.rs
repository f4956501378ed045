//! Horizontal bar chart geometry.

use serde::{Deserialize, Serialize};

use adlens_pipeline::ChartSeries;

use crate::color::Rgb;
use crate::format::ValueFormatter;
use crate::scale::{Extent, LinearScale, Scale};

/// Bar chart layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    pub width: f64,
    pub bar_height: f64,
    pub bar_gap: f64,
    /// Space reserved left of the bars for category labels.
    pub label_width: f64,
    /// Space reserved right of the bars for value labels.
    pub value_width: f64,
    pub padding: f64,
}

impl BarChartConfig {
    pub const DEFAULT_WIDTH: f64 = 500.0;
    pub const DEFAULT_BAR_HEIGHT: f64 = 24.0;
    pub const DEFAULT_BAR_GAP: f64 = 12.0;
    pub const DEFAULT_LABEL_WIDTH: f64 = 100.0;
    pub const DEFAULT_VALUE_WIDTH: f64 = 80.0;
    pub const DEFAULT_PADDING: f64 = 16.0;

    /// Horizontal room left for the longest bar.
    #[must_use]
    pub fn track_width(&self) -> f64 {
        (self.width - 2.0 * self.padding - self.label_width - self.value_width).max(0.0)
    }
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            bar_height: Self::DEFAULT_BAR_HEIGHT,
            bar_gap: Self::DEFAULT_BAR_GAP,
            label_width: Self::DEFAULT_LABEL_WIDTH,
            value_width: Self::DEFAULT_VALUE_WIDTH,
            padding: Self::DEFAULT_PADDING,
        }
    }
}

/// One input bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

impl BarDatum {
    /// One bar per series point, all in `color`.
    #[must_use]
    pub fn from_series(series: &ChartSeries, color: Rgb) -> Vec<Self> {
        series
            .points()
            .iter()
            .map(|p| Self {
                label: p.label.clone(),
                value: p.value,
                color,
            })
            .collect()
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A laid-out bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Formatted value shown after the bar.
    pub value_label: String,
    pub color: Rgb,
    pub rect: Rect,
}

/// Bar chart output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BarChart {
    /// The input had no bars.
    NoData { width: f64 },
    Ready {
        width: f64,
        height: f64,
        bars: Vec<Bar>,
    },
}

/// Lay out one bar per datum, top to bottom in input order.
///
/// Bar length is proportional to `value / max`. When every value is
/// zero all bars have zero length; negative values are drawn as
/// zero-length bars, even when no value is positive. No bar is longer
/// than the track.
#[must_use]
pub fn bar_chart(data: &[BarDatum], config: &BarChartConfig, format: &impl ValueFormatter) -> BarChart {
    if data.is_empty() {
        return BarChart::NoData {
            width: config.width,
        };
    }

    let max = data
        .iter()
        .map(|d| d.value)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);
    let track = config.track_width();
    let length = LinearScale::new(Extent::new(0.0, max), 0.0, track).with_degenerate_value(0.0);
    let x = config.padding + config.label_width;
    let pitch = config.bar_height + config.bar_gap;

    #[allow(clippy::cast_precision_loss)]
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| Bar {
            label: d.label.clone(),
            value: d.value,
            value_label: format.format_value(d.value),
            color: d.color,
            rect: Rect {
                x,
                y: pitch.mul_add(i as f64, config.padding),
                width: length.scale(d.value).max(0.0).min(track),
                height: config.bar_height,
            },
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let height = pitch.mul_add(bars.len() as f64, 2.0f64.mul_add(config.padding, -config.bar_gap));
    BarChart::Ready {
        width: config.width,
        height,
        bars,
    }
}
