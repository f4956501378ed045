//! Line chart geometry: path, markers, axis ticks and grid lines.

use serde::{Deserialize, Serialize};

use adlens_pipeline::ChartSeries;

use crate::color::{Rgb, palette};
use crate::format::{LabelFormatter, ValueFormatter};
use crate::geometry::{LinePath, Point};
use crate::scale::{Extent, IndexScale, LinearScale, Scale};

/// Space between the chart edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const DEFAULT: Self = Self {
        top: 40.0,
        right: 30.0,
        bottom: 40.0,
        left: 60.0,
    };
}

impl Default for Padding {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Line chart layout and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartConfig {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub stroke: Rgb,
    /// Radius of the per-point marker circles.
    pub marker_radius: f64,
    /// Number of y-axis ticks, spread evenly from zero to the maximum.
    pub y_ticks: usize,
    /// Upper bound on x-axis labels before subsampling kicks in.
    pub max_x_labels: usize,
}

impl LineChartConfig {
    pub const DEFAULT_WIDTH: f64 = 500.0;
    pub const DEFAULT_HEIGHT: f64 = 300.0;
    pub const DEFAULT_STROKE: Rgb = palette::BLUE;
    pub const DEFAULT_MARKER_RADIUS: f64 = 3.0;
    pub const DEFAULT_Y_TICKS: usize = 5;
    pub const DEFAULT_MAX_X_LABELS: usize = 6;

    /// Default layout with a different stroke color.
    #[must_use]
    pub fn with_stroke(stroke: Rgb) -> Self {
        Self {
            stroke,
            ..Self::default()
        }
    }
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            padding: Padding::DEFAULT,
            stroke: Self::DEFAULT_STROKE,
            marker_radius: Self::DEFAULT_MARKER_RADIUS,
            y_ticks: Self::DEFAULT_Y_TICKS,
            max_x_labels: Self::DEFAULT_MAX_X_LABELS,
        }
    }
}

/// An axis tick: formatted label and coordinate along its axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    /// x for x-axis ticks, y for y-axis ticks.
    pub position: f64,
}

/// A dashed horizontal guide at one y tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
}

/// A circle over one data point with its tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub center: Point,
    pub radius: f64,
    /// `"{x label}: {y value}"`.
    pub tooltip: String,
}

/// Everything needed to draw a line chart with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGeometry {
    pub width: f64,
    pub height: f64,
    pub stroke: Rgb,
    pub path: LinePath,
    pub markers: Vec<Marker>,
    pub x_ticks: Vec<Tick>,
    /// Baseline x-label y coordinate.
    pub x_label_y: f64,
    pub y_ticks: Vec<Tick>,
    /// Left edge of the plot area, where y labels are right-aligned.
    pub y_label_x: f64,
    pub grid: Vec<GridLine>,
}

/// Line chart output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LineChart {
    /// Fewer than two points.
    InsufficientData { width: f64, height: f64 },
    Ready(LineGeometry),
}

/// Indices kept as x labels: every `ceil(n / max_labels)`-th plus the last.
///
/// # Examples
///
/// ```
/// use adlens_export::line::x_label_indices;
///
/// assert_eq!(x_label_indices(13, 6), vec![0, 3, 6, 9, 12]);
/// assert_eq!(x_label_indices(4, 6), vec![0, 1, 2, 3]);
/// ```
#[must_use]
pub fn x_label_indices(count: usize, max_labels: usize) -> Vec<usize> {
    let step = count.div_ceil(max_labels.max(1)).max(1);
    (0..count)
        .filter(|i| i % step == 0 || *i == count - 1)
        .collect()
}

/// Lay out a line chart for `series`.
///
/// The y domain runs from zero to the series maximum. An all-zero
/// series has a degenerate domain and is drawn along the vertical
/// middle of the plot area.
#[must_use]
pub fn line_chart(
    series: &ChartSeries,
    config: &LineChartConfig,
    format_x: &impl LabelFormatter,
    format_y: &impl ValueFormatter,
) -> LineChart {
    let pad = config.padding;
    let Some(x_scale) = IndexScale::new(series.len(), pad.left, config.width - pad.right) else {
        tracing::debug!(points = series.len(), "line chart has insufficient data");
        return LineChart::InsufficientData {
            width: config.width,
            height: config.height,
        };
    };

    let y_max = series.values().fold(f64::NEG_INFINITY, f64::max);
    let domain = Extent::new(0.0, y_max);
    let y_scale = LinearScale::new(domain, config.height - pad.bottom, pad.top);

    let points: Vec<Point> = series
        .values()
        .enumerate()
        .map(|(i, v)| Point::new(x_scale.position(i), y_scale.scale(v)))
        .collect();

    let markers = series
        .points()
        .iter()
        .zip(&points)
        .map(|(p, &center)| Marker {
            center,
            radius: config.marker_radius,
            tooltip: format!(
                "{}: {}",
                format_x.format_label(&p.label),
                format_y.format_value(p.value)
            ),
        })
        .collect();

    let x_ticks = x_label_indices(series.len(), config.max_x_labels)
        .into_iter()
        .map(|i| Tick {
            label: format_x.format_label(&series.points()[i].label),
            position: x_scale.position(i),
        })
        .collect();

    let y_ticks: Vec<Tick> = y_tick_values(domain, config.y_ticks)
        .map(|value| Tick {
            label: format_y.format_value(value),
            position: y_scale.scale(value),
        })
        .collect();

    let grid = y_ticks
        .iter()
        .map(|t| GridLine {
            y: t.position,
            x1: pad.left,
            x2: config.width - pad.right,
        })
        .collect();

    LineChart::Ready(LineGeometry {
        width: config.width,
        height: config.height,
        stroke: config.stroke,
        path: LinePath::through(&points),
        markers,
        x_ticks,
        x_label_y: config.height - pad.bottom + 15.0,
        y_ticks,
        y_label_x: pad.left - 8.0,
        grid,
    })
}

/// `count` values evenly spaced from `domain.min` to `domain.max`.
#[allow(clippy::cast_precision_loss)]
fn y_tick_values(domain: Extent, count: usize) -> impl Iterator<Item = f64> {
    let intervals = count.saturating_sub(1).max(1) as f64;
    (0..count).map(move |i| domain.span().mul_add(i as f64 / intervals, domain.min))
}
