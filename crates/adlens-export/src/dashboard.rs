//! Charts for each dashboard view, serialized to SVG.
//!
//! Binds every view's series to its chart kind, colors and formatters:
//!
//! | view        | charts |
//! |-------------|--------|
//! | demographic | spend and revenue per age group (bars) |
//! | device      | revenue and conversions per device (bars) |
//! | region      | revenue and spend bubble maps, revenue and spend region markers |
//! | weekly      | revenue and spend per week (lines) |

use serde::Serialize;

use adlens_pipeline::views::{DemographicView, DeviceView, RegionView, WeeklyView};
use adlens_pipeline::{ChartSeries, DashboardViews, Device};

use crate::bar::{BarDatum, bar_chart};
use crate::bubble::bubble_map;
use crate::config::ChartConfigs;
use crate::format::{LabelFormat, ValueFormat};
use crate::geo::GeoTable;
use crate::line::{LineChartConfig, line_chart};
use crate::region::{RegionMapConfig, region_markers};
use crate::svg::{
    ChartMetadata, bar_chart_svg, bubble_map_svg, line_chart_svg, region_map_svg,
};

/// One serialized chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChart {
    /// File-name friendly identifier, e.g. `weekly-revenue`.
    pub name: &'static str,
    pub title: &'static str,
    pub svg: String,
}

impl RenderedChart {
    fn new(name: &'static str, title: &'static str, svg: String) -> Self {
        Self { name, title, svg }
    }
}

fn bars(
    name: &'static str,
    title: &'static str,
    data: &[BarDatum],
    configs: &ChartConfigs,
    format: ValueFormat,
) -> RenderedChart {
    let chart = bar_chart(data, &configs.bar, &format);
    RenderedChart::new(name, title, bar_chart_svg(&chart, &ChartMetadata::titled(title)))
}

/// Spend and revenue per age group.
#[must_use]
pub fn demographic_charts(view: &DemographicView, configs: &ChartConfigs) -> Vec<RenderedChart> {
    let palette = configs.bar_palette;
    vec![
        bars(
            "spend-by-age-group",
            "Total Spend by Age Group",
            &BarDatum::from_series(&view.spend_by_age_group, palette.spend),
            configs,
            ValueFormat::CurrencyWhole,
        ),
        bars(
            "revenue-by-age-group",
            "Total Revenue by Age Group",
            &BarDatum::from_series(&view.revenue_by_age_group, palette.revenue),
            configs,
            ValueFormat::CurrencyWhole,
        ),
    ]
}

/// Revenue and conversions per device, one color per device.
#[must_use]
pub fn device_charts(view: &DeviceView, configs: &ChartConfigs) -> Vec<RenderedChart> {
    let palette = configs.bar_palette;
    let colored = |series: &ChartSeries| -> Vec<BarDatum> {
        series
            .points()
            .iter()
            .map(|p| BarDatum {
                label: p.label.clone(),
                value: p.value,
                color: match Device::from_label(&p.label) {
                    Some(Device::Desktop) => palette.desktop,
                    Some(Device::Mobile) | None => palette.mobile,
                },
            })
            .collect()
    };
    vec![
        bars(
            "revenue-by-device",
            "Revenue by Device",
            &colored(&view.revenue),
            configs,
            ValueFormat::CurrencyWhole,
        ),
        bars(
            "conversions-by-device",
            "Conversions by Device",
            &colored(&view.conversions),
            configs,
            ValueFormat::GroupedInteger,
        ),
    ]
}

fn region_marker_chart(
    name: &'static str,
    title: &'static str,
    series: &ChartSeries,
    config: &RegionMapConfig,
    geo: &GeoTable,
) -> RenderedChart {
    let map = region_markers(series, geo, config, &ValueFormat::CurrencyWhole);
    RenderedChart::new(
        name,
        title,
        region_map_svg(&map, config, &ChartMetadata::titled(title)),
    )
}

/// Bubble maps and region-marker maps for revenue and spend.
#[must_use]
pub fn region_charts(view: &RegionView, configs: &ChartConfigs, geo: &GeoTable) -> Vec<RenderedChart> {
    let bubbles = |name: &'static str, title: &'static str, series: &ChartSeries| {
        let map = bubble_map(series, geo, &configs.bubble, &ValueFormat::CurrencyWhole);
        RenderedChart::new(
            name,
            title,
            bubble_map_svg(&map, &configs.bubble, &ChartMetadata::titled(title)),
        )
    };
    vec![
        bubbles("revenue-bubbles", "Revenue by Region", &view.revenue),
        bubbles("spend-bubbles", "Spend by Region", &view.spend),
        region_marker_chart(
            "revenue-regions",
            "Revenue by Region",
            &view.revenue,
            &configs.region_revenue,
            geo,
        ),
        region_marker_chart(
            "spend-regions",
            "Spend by Region",
            &view.spend,
            &configs.region_spend,
            geo,
        ),
    ]
}

fn weekly_line(
    name: &'static str,
    title: &'static str,
    series: &ChartSeries,
    config: &LineChartConfig,
) -> RenderedChart {
    let chart = line_chart(series, config, &LabelFormat::ShortDate, &ValueFormat::Thousands);
    RenderedChart::new(name, title, line_chart_svg(&chart, &ChartMetadata::titled(title)))
}

/// Revenue and spend per week.
#[must_use]
pub fn weekly_charts(view: &WeeklyView, configs: &ChartConfigs) -> Vec<RenderedChart> {
    vec![
        weekly_line(
            "weekly-revenue",
            "Revenue by Week",
            &view.revenue,
            &configs.weekly_revenue,
        ),
        weekly_line("weekly-spend", "Spend by Week", &view.spend, &configs.weekly_spend),
    ]
}

/// Every chart of every view, in view order.
#[must_use]
pub fn dashboard_charts(
    views: &DashboardViews,
    configs: &ChartConfigs,
    geo: &GeoTable,
) -> Vec<RenderedChart> {
    let mut charts = demographic_charts(&views.demographic, configs);
    charts.extend(device_charts(&views.device, configs));
    charts.extend(region_charts(&views.region, configs, geo));
    charts.extend(weekly_charts(&views.weekly, configs));
    charts
}
