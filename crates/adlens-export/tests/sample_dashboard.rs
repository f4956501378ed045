//! Integration test: render every chart for the bundled sample dataset.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use adlens_export::bubble::{BubbleMap, bubble_map};
use adlens_export::format::ValueFormat;
use adlens_export::line::{LineChart, line_chart};
use adlens_export::region::{RegionMap, region_markers};
use adlens_export::{ChartConfigs, GeoTable, dashboard_charts};
use adlens_pipeline::{DashboardViews, MarketingData, build_views};

fn sample_views() -> DashboardViews {
    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    let json = std::fs::read_to_string(workspace_root.join("assets/sample-dataset.json"))
        .expect("sample dataset should be readable");
    let data: MarketingData = serde_json::from_str(&json).expect("sample dataset should parse");
    build_views(&data)
}

#[test]
fn every_chart_is_a_complete_svg_document() {
    let charts = dashboard_charts(&sample_views(), &ChartConfigs::default(), &GeoTable::builtin());
    assert_eq!(charts.len(), 10);
    for chart in &charts {
        assert!(chart.svg.starts_with("<?xml"), "{} lacks declaration", chart.name);
        assert!(chart.svg.contains("<svg"), "{} lacks root", chart.name);
        assert!(
            chart.svg.contains(&format!("<title>{}</title>", chart.title)),
            "{} lacks title",
            chart.name
        );
        assert!(chart.svg.trim_end().ends_with("</svg>"));
    }
}

#[test]
fn revenue_bubbles_drop_unmapped_and_sort_descending() {
    let views = sample_views();
    let config = ChartConfigs::default();
    let map = bubble_map(
        &views.region.revenue,
        &GeoTable::builtin(),
        &config.bubble,
        &ValueFormat::CurrencyWhole,
    );
    let BubbleMap::Ready(bubbles) = map else {
        unreachable!("sample has regions");
    };
    let regions: Vec<&str> = bubbles.iter().map(|b| b.region.as_str()).collect();
    assert_eq!(regions, vec!["Dubai", "Riyadh", "Cairo", "Istanbul"]);
    // Lisbon (3000) is unmapped but still sets the minimum, so Istanbul
    // is not the low color.
    assert_ne!(bubbles[3].color, config.bubble.low_color);
    assert_eq!(bubbles[0].color, config.bubble.high_color);
}

#[test]
fn region_markers_range_over_mapped_regions_only() {
    let views = sample_views();
    let config = ChartConfigs::default();
    let map = region_markers(
        &views.region.revenue,
        &GeoTable::builtin(),
        &config.region_revenue,
        &ValueFormat::CurrencyWhole,
    );
    let RegionMap::Ready { markers, zoom, .. } = map else {
        unreachable!("sample has regions");
    };
    assert_eq!(zoom, 4);
    assert_eq!(markers.len(), 4);
    let istanbul = markers.iter().find(|m| m.region == "Istanbul").unwrap();
    assert_eq!(istanbul.color, config.region_revenue.low_color);
    assert!((markers[0].radius - 30.0).abs() < 1e-9);
}

#[test]
fn weekly_lines_have_one_point_per_week() {
    let views = sample_views();
    let config = ChartConfigs::default();
    let chart = line_chart(
        &views.weekly.revenue,
        &config.weekly_revenue,
        &adlens_export::format::LabelFormat::ShortDate,
        &ValueFormat::Thousands,
    );
    let LineChart::Ready(geometry) = chart else {
        unreachable!("sample has four weeks");
    };
    assert_eq!(geometry.path.commands().len(), 4);
    assert_eq!(geometry.markers[1].tooltip, "Mar 11: $20k");
    let labels: Vec<&str> = geometry.x_ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Mar 4", "Mar 11", "Mar 18", "Mar 25"]);
}
