//! Per-view builders: demographic, device, regional and weekly breakdowns.
//!
//! Each view runs one or more [`aggregate`] passes and shapes the
//! grouped totals into the summary figures, table rows and
//! [`ChartSeries`] its dashboard page renders.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::aggregate::{Dimension, Grouped, aggregate};
use crate::metrics::{DerivedRates, Percent, derive_rates};
use crate::types::{Campaign, ChartSeries, Device, GroupTotals, SeriesPoint};

/// Gender label for the male summary and table.
pub const MALE: &str = "Male";
/// Gender label for the female summary and table.
pub const FEMALE: &str = "Female";

/// Headline figures for one gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GenderSummary {
    pub clicks: u64,
    /// Apportioned spend share.
    pub spend: f64,
    /// Apportioned revenue share.
    pub revenue: f64,
}

impl From<&GroupTotals> for GenderSummary {
    fn from(totals: &GroupTotals) -> Self {
        Self {
            clicks: totals.clicks,
            spend: totals.spend,
            revenue: totals.revenue,
        }
    }
}

/// One row of an age-group performance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupRow {
    pub age_group: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: Percent,
    pub conversion_rate: Percent,
}

/// Demographic breakdown: gender summaries, age-group money series and
/// per-gender age-group tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicView {
    pub male: GenderSummary,
    pub female: GenderSummary,
    /// Spend share per age group, in first-encounter order.
    pub spend_by_age_group: ChartSeries,
    /// Revenue share per age group, in first-encounter order.
    pub revenue_by_age_group: ChartSeries,
    /// Male age groups, impressions descending.
    pub male_age_groups: Vec<AgeGroupRow>,
    /// Female age groups, impressions descending.
    pub female_age_groups: Vec<AgeGroupRow>,
}

impl DemographicView {
    /// Build the view from all campaigns.
    #[must_use]
    pub fn build(campaigns: &[Campaign]) -> Self {
        let genders = aggregate(campaigns, &Dimension::Gender);
        let ages = aggregate(campaigns, &Dimension::AgeGroup);

        let summary = |gender: &str| genders.get(gender).map(GenderSummary::from).unwrap_or_default();

        let view = Self {
            male: summary(MALE),
            female: summary(FEMALE),
            spend_by_age_group: series(&ages, |t| t.spend),
            revenue_by_age_group: series(&ages, |t| t.revenue),
            male_age_groups: age_group_table(campaigns, MALE),
            female_age_groups: age_group_table(campaigns, FEMALE),
        };
        tracing::debug!(
            genders = genders.len(),
            age_groups = ages.len(),
            "built demographic view"
        );
        view
    }
}

fn age_group_table(campaigns: &[Campaign], gender: &str) -> Vec<AgeGroupRow> {
    let grouped = aggregate(campaigns, &Dimension::AgeGroupForGender(gender.to_owned()));
    let mut rows: Vec<AgeGroupRow> = grouped
        .iter()
        .map(|(age_group, totals)| {
            let rates = derive_rates(totals);
            AgeGroupRow {
                age_group: age_group.to_owned(),
                impressions: totals.impressions,
                clicks: totals.clicks,
                conversions: totals.conversions,
                ctr: rates.ctr,
                conversion_rate: rates.conversion_rate,
            }
        })
        .collect();
    // Stable: equal impressions keep encounter order.
    rows.sort_by(|a, b| b.impressions.cmp(&a.impressions));
    rows
}

/// One row of the device performance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    pub device: Device,
    pub totals: GroupTotals,
    pub rates: DerivedRates,
}

/// Device breakdown over the fixed Mobile/Desktop buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceView {
    /// One row per bucket in [`Device::ALL`] order, present even when empty.
    pub rows: Vec<DeviceRow>,
    /// Revenue per device.
    pub revenue: ChartSeries,
    /// Conversions per device.
    pub conversions: ChartSeries,
}

impl DeviceView {
    /// Build the view from all campaigns.
    #[must_use]
    pub fn build(campaigns: &[Campaign]) -> Self {
        let grouped = aggregate(campaigns, &Dimension::Device);
        let rows: Vec<DeviceRow> = Device::ALL
            .into_iter()
            .map(|device| {
                let totals = grouped.get(device.label()).copied().unwrap_or_default();
                DeviceRow {
                    device,
                    totals,
                    rates: derive_rates(&totals),
                }
            })
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let conversions = rows
            .iter()
            .map(|r| SeriesPoint::new(r.device.label(), r.totals.conversions as f64))
            .collect();
        let revenue = rows
            .iter()
            .map(|r| SeriesPoint::new(r.device.label(), r.totals.revenue))
            .collect();

        tracing::debug!(buckets = rows.len(), "built device view");
        Self {
            rows,
            revenue,
            conversions,
        }
    }

    /// Totals for one bucket.
    #[must_use]
    pub fn totals(&self, device: Device) -> GroupTotals {
        self.rows
            .iter()
            .find(|r| r.device == device)
            .map(|r| r.totals)
            .unwrap_or_default()
    }
}

/// Regional breakdown: revenue and spend per region, unfiltered.
///
/// Map views drop regions without a known coordinate; that filtering
/// belongs to the chart layer's geo lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionView {
    pub revenue: ChartSeries,
    pub spend: ChartSeries,
}

impl RegionView {
    /// Build the view from all campaigns.
    #[must_use]
    pub fn build(campaigns: &[Campaign]) -> Self {
        let grouped = aggregate(campaigns, &Dimension::Region);
        tracing::debug!(regions = grouped.len(), "built region view");
        Self {
            revenue: series(&grouped, |t| t.revenue),
            spend: series(&grouped, |t| t.spend),
        }
    }
}

/// Weekly breakdown: revenue and spend per week, chronological.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyView {
    pub revenue: ChartSeries,
    pub spend: ChartSeries,
}

impl WeeklyView {
    /// Build the view from all campaigns.
    ///
    /// Weeks are ordered by their parsed date. Week labels that do not
    /// parse as a date sort after every dated week, by label.
    #[must_use]
    pub fn build(campaigns: &[Campaign]) -> Self {
        let grouped = aggregate(campaigns, &Dimension::Week);
        let mut weeks: Vec<(&str, &GroupTotals)> = grouped.iter().collect();
        weeks.sort_by_cached_key(|&(week, _)| week_sort_key(week));

        tracing::debug!(weeks = weeks.len(), "built weekly view");
        Self {
            revenue: weeks
                .iter()
                .map(|(week, t)| SeriesPoint::new(*week, t.revenue))
                .collect(),
            spend: weeks
                .iter()
                .map(|(week, t)| SeriesPoint::new(*week, t.spend))
                .collect(),
        }
    }
}

/// Parse a `week_start` value as a calendar date.
///
/// Accepts a plain ISO date (`2024-03-04`) or an RFC 3339 timestamp
/// (`2024-03-04T00:00:00Z`).
#[must_use]
pub fn parse_week_start(week_start: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(week_start, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(week_start)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn week_sort_key(week_start: &str) -> (bool, Option<NaiveDate>, &str) {
    let date = parse_week_start(week_start);
    (date.is_none(), date, week_start)
}

fn series(grouped: &Grouped, value: impl Fn(&GroupTotals) -> f64) -> ChartSeries {
    grouped
        .iter()
        .map(|(key, totals)| SeriesPoint::new(key, value(totals)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        DemographicBreakdown, DevicePerformance, Performance, RegionalPerformance,
        WeeklyPerformance,
    };

    fn slice(gender: &str, age: &str, pct: f64, imp: u64) -> DemographicBreakdown {
        DemographicBreakdown {
            gender: gender.to_owned(),
            age_group: age.to_owned(),
            percentage_of_audience: pct,
            performance: Performance {
                impressions: imp,
                clicks: imp / 10,
                conversions: imp / 100,
            },
        }
    }

    fn week(start: &str, revenue: f64, spend: f64) -> WeeklyPerformance {
        WeeklyPerformance {
            week_start: start.to_owned(),
            revenue,
            spend,
        }
    }

    // --- Demographic ---

    #[test]
    fn demographic_age_series_carry_apportioned_money() {
        let c = Campaign {
            spend: 1000.0,
            revenue: 2000.0,
            demographic_breakdown: vec![
                slice(MALE, "18-24", 25.0, 100),
                slice(FEMALE, "18-24", 25.0, 100),
                slice(MALE, "25-34", 50.0, 100),
            ],
            ..Campaign::default()
        };
        let view = DemographicView::build(&[c]);
        let spend: Vec<(String, f64)> = view
            .spend_by_age_group
            .points()
            .iter()
            .map(|p| (p.label.clone(), p.value))
            .collect();
        assert_eq!(
            spend,
            vec![("18-24".to_owned(), 500.0), ("25-34".to_owned(), 500.0)]
        );
        assert!((view.revenue_by_age_group.points()[1].value - 1000.0).abs() < f64::EPSILON);
        assert!((view.male.spend - 750.0).abs() < f64::EPSILON);
        assert!((view.female.spend - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn demographic_tables_sorted_by_impressions_desc() {
        let c = Campaign {
            spend: 10.0,
            revenue: 10.0,
            demographic_breakdown: vec![
                slice(MALE, "18-24", 10.0, 100),
                slice(MALE, "25-34", 10.0, 900),
                slice(MALE, "35-44", 10.0, 400),
            ],
            ..Campaign::default()
        };
        let view = DemographicView::build(&[c]);
        let order: Vec<&str> = view
            .male_age_groups
            .iter()
            .map(|r| r.age_group.as_str())
            .collect();
        assert_eq!(order, vec!["25-34", "35-44", "18-24"]);
        assert!(view.female_age_groups.is_empty());
        assert_eq!(view.male_age_groups[0].ctr.to_string(), "10.00%");
    }

    #[test]
    fn missing_gender_summarizes_as_zero() {
        let view = DemographicView::build(&[]);
        assert_eq!(view.male, GenderSummary::default());
        assert!(view.spend_by_age_group.is_empty());
    }

    // --- Device ---

    #[test]
    fn device_view_always_has_both_buckets_in_order() {
        let c = Campaign {
            device_performance: vec![DevicePerformance {
                device: "Desktop".to_owned(),
                impressions: 1000,
                clicks: 50,
                conversions: 5,
                spend: 100.0,
                revenue: 300.0,
            }],
            ..Campaign::default()
        };
        let view = DeviceView::build(&[c]);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].device, Device::Mobile);
        assert_eq!(view.rows[0].rates.roas.to_string(), "0.00x");
        assert_eq!(view.rows[1].rates.ctr.to_string(), "5.00%");
        assert_eq!(view.rows[1].rates.conversion_rate.to_string(), "10.00%");
        assert_eq!(view.rows[1].rates.roas.to_string(), "3.00x");
        assert_eq!(view.totals(Device::Desktop).impressions, 1000);
        let labels: Vec<&str> = view.revenue.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Mobile", "Desktop"]);
        assert!((view.conversions.points()[1].value - 5.0).abs() < f64::EPSILON);
    }

    // --- Region ---

    #[test]
    fn region_view_keeps_unknown_regions() {
        let c = Campaign {
            regional_performance: vec![
                RegionalPerformance {
                    region: "Dubai".to_owned(),
                    revenue: 10.0,
                    spend: 5.0,
                },
                RegionalPerformance {
                    region: "Atlantis".to_owned(),
                    revenue: 3.0,
                    spend: 1.0,
                },
            ],
            ..Campaign::default()
        };
        let view = RegionView::build(&[c]);
        assert_eq!(view.revenue.len(), 2);
        assert_eq!(view.spend.points()[1].label, "Atlantis");
    }

    // --- Weekly ---

    #[test]
    fn weeks_sorted_chronologically_not_by_encounter() {
        let a = Campaign {
            weekly_performance: vec![week("2024-02-05", 1.0, 1.0), week("2024-01-29", 2.0, 2.0)],
            ..Campaign::default()
        };
        let b = Campaign {
            weekly_performance: vec![week("2024-01-22", 3.0, 3.0), week("2024-02-05", 4.0, 4.0)],
            ..Campaign::default()
        };
        let view = WeeklyView::build(&[a, b]);
        let labels: Vec<&str> = view.revenue.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01-22", "2024-01-29", "2024-02-05"]);
        assert!((view.revenue.points()[2].value - 5.0).abs() < f64::EPSILON);
        assert_eq!(view.spend.len(), 3);
    }

    #[test]
    fn undated_weeks_sort_last() {
        let c = Campaign {
            weekly_performance: vec![
                week("someday", 1.0, 1.0),
                week("2024-01-01T00:00:00Z", 1.0, 1.0),
                week("2023-12-25", 1.0, 1.0),
            ],
            ..Campaign::default()
        };
        let view = WeeklyView::build(&[c]);
        let labels: Vec<&str> = view.spend.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-12-25", "2024-01-01T00:00:00Z", "someday"]);
    }

    #[test]
    fn undated_weeks_order_by_label_and_totals_follow_their_week() {
        let c = Campaign {
            weekly_performance: vec![
                week("tbd", 5.0, 50.0),
                week("2024-02-05", 3.0, 30.0),
                week("later", 6.0, 60.0),
                week("2024-01-29", 2.0, 20.0),
                week("2024-02-05", 4.0, 40.0),
            ],
            ..Campaign::default()
        };
        let view = WeeklyView::build(&[c]);
        let points: Vec<(&str, f64)> = view
            .revenue
            .points()
            .iter()
            .map(|p| (p.label.as_str(), p.value))
            .collect();
        assert_eq!(
            points,
            vec![("2024-01-29", 2.0), ("2024-02-05", 7.0), ("later", 6.0), ("tbd", 5.0)]
        );
        let spend: Vec<f64> = view.spend.points().iter().map(|p| p.value).collect();
        assert_eq!(spend, vec![20.0, 70.0, 60.0, 50.0]);
    }

    #[test]
    fn parse_week_start_formats() {
        assert_eq!(
            parse_week_start("2024-03-04"),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(
            parse_week_start("2024-03-04T10:00:00+00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(parse_week_start("March 4"), None);
    }
}
