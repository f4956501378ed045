//! SVG serializers for chart geometry.
//!
//! Each chart becomes a standalone SVG document built with the [`svg`]
//! crate, which handles XML escaping of labels and tooltips. Charts in
//! their no-data state render a placeholder message instead of an
//! empty canvas.
//!
//! These are pure functions with no I/O -- they return a `String`.

use svg::Document;
use svg::node::Text as TextNode;
use svg::node::element::{Circle, Description, Group, Line, Path, Rectangle, Text, Title};

use crate::bar::BarChart;
use crate::bubble::{BubbleMap, BubbleMapConfig};
use crate::line::LineChart;
use crate::region::{RegionMap, RegionMapConfig};

/// Placeholder for a line chart with fewer than two points.
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough data to display chart";
/// Placeholder for an empty bar chart or map.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Placeholder canvas height for an empty bar chart.
const EMPTY_BAR_HEIGHT: f64 = 120.0;
const AXIS_COLOR: &str = "#6b7280";
const LABEL_COLOR: &str = "#9ca3af";
const FONT_SIZE: u32 = 10;

/// Optional `<title>` and `<desc>` for a chart document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartMetadata<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> ChartMetadata<'a> {
    /// Metadata with a title only.
    #[must_use]
    pub const fn titled(title: &'a str) -> Self {
        Self {
            title: Some(title),
            description: None,
        }
    }
}

fn document(width: f64, height: f64, metadata: &ChartMetadata<'_>) -> Document {
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width} {height}"));
    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(TextNode::new(description)));
    }
    doc
}

/// The svg crate omits the XML declaration, so we prepend it.
fn finish(doc: &Document) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

fn placeholder(width: f64, height: f64, message: &str, metadata: &ChartMetadata<'_>) -> String {
    let doc = document(width, height, metadata).add(
        Text::new(message)
            .set("x", width / 2.0)
            .set("y", height / 2.0)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("fill", LABEL_COLOR),
    );
    finish(&doc)
}

/// Serialize a line chart.
///
/// # Examples
///
/// ```
/// use adlens_export::format::{LabelFormat, ValueFormat};
/// use adlens_export::line::{LineChartConfig, line_chart};
/// use adlens_export::svg::{ChartMetadata, line_chart_svg};
/// use adlens_pipeline::{ChartSeries, SeriesPoint};
///
/// let series = ChartSeries::new(vec![SeriesPoint::new("a", 0.0), SeriesPoint::new("b", 100.0)]);
/// let chart = line_chart(&series, &LineChartConfig::default(), &LabelFormat::Raw, &ValueFormat::CurrencyWhole);
/// let svg = line_chart_svg(&chart, &ChartMetadata::titled("Weekly Revenue"));
/// assert!(svg.contains("<title>Weekly Revenue</title>"));
/// assert!(svg.contains("M60,260 L470,40"));
/// ```
#[must_use]
pub fn line_chart_svg(chart: &LineChart, metadata: &ChartMetadata<'_>) -> String {
    let g = match chart {
        LineChart::InsufficientData { width, height } => {
            return placeholder(*width, *height, INSUFFICIENT_DATA_MESSAGE, metadata);
        }
        LineChart::Ready(g) => g,
    };

    let mut doc = document(g.width, g.height, metadata);

    for (tick, line) in g.y_ticks.iter().zip(&g.grid) {
        doc = doc.add(
            Group::new()
                .add(
                    Line::new()
                        .set("x1", line.x1)
                        .set("y1", line.y)
                        .set("x2", line.x2)
                        .set("y2", line.y)
                        .set("stroke", AXIS_COLOR)
                        .set("stroke-width", 0.5)
                        .set("stroke-dasharray", "2,2"),
                )
                .add(
                    Text::new(tick.label.as_str())
                        .set("x", g.y_label_x)
                        .set("y", tick.position)
                        .set("dy", "0.32em")
                        .set("text-anchor", "end")
                        .set("font-size", FONT_SIZE)
                        .set("fill", LABEL_COLOR),
                ),
        );
    }

    for tick in &g.x_ticks {
        doc = doc.add(
            Text::new(tick.label.as_str())
                .set("x", tick.position)
                .set("y", g.x_label_y)
                .set("text-anchor", "middle")
                .set("font-size", FONT_SIZE)
                .set("fill", LABEL_COLOR),
        );
    }

    let stroke = g.stroke.to_string();
    doc = doc.add(
        Path::new()
            .set("d", g.path.to_svg_data())
            .set("fill", "none")
            .set("stroke", stroke.as_str())
            .set("stroke-width", 2),
    );

    for marker in &g.markers {
        doc = doc.add(
            Circle::new()
                .set("cx", marker.center.x)
                .set("cy", marker.center.y)
                .set("r", marker.radius)
                .set("fill", stroke.as_str())
                .add(Title::new(marker.tooltip.as_str())),
        );
    }

    finish(&doc)
}

/// Serialize a horizontal bar chart.
#[must_use]
pub fn bar_chart_svg(chart: &BarChart, metadata: &ChartMetadata<'_>) -> String {
    let (width, height, bars) = match chart {
        BarChart::NoData { width } => {
            return placeholder(*width, EMPTY_BAR_HEIGHT, NO_DATA_MESSAGE, metadata);
        }
        BarChart::Ready {
            width,
            height,
            bars,
        } => (*width, *height, bars),
    };

    let mut doc = document(width, height, metadata);
    for bar in bars {
        let r = bar.rect;
        let middle = r.y + r.height / 2.0;
        doc = doc.add(
            Group::new()
                .add(
                    Text::new(bar.label.as_str())
                        .set("x", r.x - 8.0)
                        .set("y", middle)
                        .set("dy", "0.32em")
                        .set("text-anchor", "end")
                        .set("font-size", FONT_SIZE)
                        .set("fill", LABEL_COLOR),
                )
                .add(
                    Rectangle::new()
                        .set("x", r.x)
                        .set("y", r.y)
                        .set("width", r.width)
                        .set("height", r.height)
                        .set("rx", 4)
                        .set("fill", bar.color.to_string())
                        .add(Title::new(format!("{}: {}", bar.label, bar.value_label))),
                )
                .add(
                    Text::new(bar.value_label.as_str())
                        .set("x", r.x + r.width + 8.0)
                        .set("y", middle)
                        .set("dy", "0.32em")
                        .set("font-size", FONT_SIZE)
                        .set("fill", LABEL_COLOR),
                ),
        );
    }
    finish(&doc)
}

/// Serialize a bubble map.
#[must_use]
pub fn bubble_map_svg(
    map: &BubbleMap,
    config: &BubbleMapConfig,
    metadata: &ChartMetadata<'_>,
) -> String {
    let bubbles = match map {
        BubbleMap::NoData => {
            return placeholder(config.width, config.height, NO_DATA_MESSAGE, metadata);
        }
        BubbleMap::Ready(bubbles) => bubbles,
    };

    let mut doc = document(config.width, config.height, metadata);
    for bubble in bubbles {
        let color = bubble.color.to_string();
        doc = doc.add(
            Group::new().add(
                Circle::new()
                    .set("cx", bubble.center.x)
                    .set("cy", bubble.center.y)
                    .set("r", bubble.radius)
                    .set("fill", color.as_str())
                    .set("fill-opacity", config.fill_opacity)
                    .set("stroke", color.as_str())
                    .set("stroke-width", 1)
                    .add(Title::new(bubble.tooltip.as_str())),
            ),
        );
    }
    finish(&doc)
}

/// Serialize region markers, projected equirectangularly onto the
/// configured plane.
#[must_use]
pub fn region_map_svg(
    map: &RegionMap,
    config: &RegionMapConfig,
    metadata: &ChartMetadata<'_>,
) -> String {
    let markers = match map {
        RegionMap::NoData => {
            return placeholder(config.width, config.height, NO_DATA_MESSAGE, metadata);
        }
        RegionMap::Ready { markers, .. } => markers,
    };

    let mut doc = document(config.width, config.height, metadata);
    for marker in markers {
        let center = marker.position.project(config.width, config.height);
        let color = marker.color.to_string();
        doc = doc.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", marker.radius)
                .set("fill", color.as_str())
                .set("fill-opacity", config.fill_opacity)
                .set("stroke", color.as_str())
                .add(Title::new(format!("{}\n{}", marker.region, marker.value_label))),
        );
    }
    finish(&doc)
}
