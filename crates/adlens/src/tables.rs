//! Plain-text rendering of the view tables.

use std::fmt::Write as _;

use adlens_export::format::{currency_whole, grouped_integer};
use adlens_pipeline::views::{AgeGroupRow, DemographicView, DeviceView, GenderSummary};
use adlens_pipeline::{ChartSeries, RegionView, WeeklyView};

#[allow(clippy::cast_precision_loss)]
fn count(value: u64) -> String {
    grouped_integer(value as f64)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}\n{}", "=".repeat(60));
}

fn gender_line(out: &mut String, label: &str, summary: &GenderSummary) {
    let _ = writeln!(
        out,
        "{label:<8} spend {:>12}  revenue {:>12}  clicks {:>10}",
        currency_whole(summary.spend),
        currency_whole(summary.revenue),
        count(summary.clicks),
    );
}

fn age_table(out: &mut String, label: &str, rows: &[AgeGroupRow]) {
    let _ = writeln!(out, "\n{label} age groups");
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>10} {:>12} {:>8} {:>10}",
        "Age Group", "Impressions", "Clicks", "Conversions", "CTR", "Conv Rate"
    );
    let _ = writeln!(out, "{}", "-".repeat(69));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} {:>12} {:>10} {:>12} {:>8} {:>10}",
            row.age_group,
            count(row.impressions),
            count(row.clicks),
            count(row.conversions),
            row.ctr.to_string(),
            row.conversion_rate.to_string(),
        );
    }
}

fn series_table(out: &mut String, label: &str, series: &ChartSeries) {
    let _ = writeln!(out, "\n{label}");
    for point in series.points() {
        let _ = writeln!(out, "  {:<16} {:>12}", point.label, currency_whole(point.value));
    }
}

pub fn demographic(view: &DemographicView) -> String {
    let mut out = String::new();
    heading(&mut out, "Demographics");
    gender_line(&mut out, "Male", &view.male);
    gender_line(&mut out, "Female", &view.female);
    series_table(&mut out, "Spend by age group", &view.spend_by_age_group);
    series_table(&mut out, "Revenue by age group", &view.revenue_by_age_group);
    age_table(&mut out, "Male", &view.male_age_groups);
    age_table(&mut out, "Female", &view.female_age_groups);
    out
}

pub fn device(view: &DeviceView) -> String {
    let mut out = String::new();
    heading(&mut out, "Devices");
    let _ = writeln!(
        out,
        "{:<8} {:>12} {:>10} {:>12} {:>12} {:>12} {:>8} {:>10} {:>8}",
        "Device",
        "Impressions",
        "Clicks",
        "Conversions",
        "Spend",
        "Revenue",
        "CTR",
        "Conv Rate",
        "ROAS"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:<8} {:>12} {:>10} {:>12} {:>12} {:>12} {:>8} {:>10} {:>8}",
            row.device.label(),
            count(row.totals.impressions),
            count(row.totals.clicks),
            count(row.totals.conversions),
            currency_whole(row.totals.spend),
            currency_whole(row.totals.revenue),
            row.rates.ctr.to_string(),
            row.rates.conversion_rate.to_string(),
            row.rates.roas.to_string(),
        );
    }
    out
}

pub fn region(view: &RegionView) -> String {
    let mut out = String::new();
    heading(&mut out, "Regions");
    series_table(&mut out, "Revenue by region", &view.revenue);
    series_table(&mut out, "Spend by region", &view.spend);
    out
}

pub fn weekly(view: &WeeklyView) -> String {
    let mut out = String::new();
    heading(&mut out, "Weekly");
    series_table(&mut out, "Revenue by week", &view.revenue);
    series_table(&mut out, "Spend by week", &view.spend);
    out
}

#[cfg(test)]
mod tests {
    use adlens_pipeline::{Campaign, DevicePerformance, MarketingData, build_views};

    use super::*;

    fn views() -> adlens_pipeline::DashboardViews {
        build_views(&MarketingData {
            campaigns: vec![Campaign {
                spend: 100.0,
                revenue: 250.0,
                device_performance: vec![DevicePerformance {
                    device: "Mobile".to_owned(),
                    impressions: 12_000,
                    clicks: 300,
                    conversions: 30,
                    spend: 100.0,
                    revenue: 250.0,
                }],
                ..Campaign::default()
            }],
        })
    }

    #[test]
    fn device_table_lists_both_buckets_with_rates() {
        let text = device(&views().device);
        assert!(text.contains("Mobile"));
        assert!(text.contains("Desktop"));
        assert!(text.contains("12,000"));
        assert!(text.contains("2.50%"));
        assert!(text.contains("2.50x"));
        assert!(text.contains("0.00x"));
    }

    #[test]
    fn empty_demographics_still_show_headline_figures() {
        let text = demographic(&views().demographic);
        assert!(text.starts_with("Demographics\n"));
        assert!(text.contains("Male"));
        assert!(text.contains("$0"));
    }
}
