//! adlens-export: Chart scales, geometry and SVG serializers (sans-IO)
//!
//! Turns the ordered series built by `adlens-pipeline` into drawable
//! geometry: scales map values to coordinates, radii and colors; the
//! chart builders lay out lines, bars, bubbles and region markers; the
//! [`svg`](mod@svg) module serializes the result.
//!
//! Every chart has an explicit no-data state distinct from a successful
//! but empty layout.

pub mod bar;
pub mod bubble;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod geo;
pub mod geometry;
pub mod line;
pub mod region;
pub mod scale;
pub mod svg;

pub use bar::{BarChart, BarChartConfig, BarDatum, bar_chart};
pub use bubble::{Bubble, BubbleMap, BubbleMapConfig, bubble_map};
pub use color::{ColorError, ColorScale, Rgb};
pub use config::ChartConfigs;
pub use dashboard::{RenderedChart, dashboard_charts};
pub use geo::{GeoTable, LatLng};
pub use line::{LineChart, LineChartConfig, line_chart};
pub use region::{RegionMap, RegionMapConfig, region_markers};
pub use scale::{Extent, IndexScale, LinearScale, RadiusScale, Scale};
