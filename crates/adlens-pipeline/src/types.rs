//! Shared types for the adlens aggregation pipeline.

use serde::{Deserialize, Serialize};

/// The full nested dataset supplied by the upstream data source.
///
/// Only the campaign list is consumed; any other top-level fields in the
/// source document are ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingData {
    /// Every campaign in the dataset, in source order.
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

/// A unit of spend/revenue attribution with nested per-dimension breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Display name. Not used for grouping.
    #[serde(default)]
    pub name: String,
    /// Campaign-level spend (currency).
    pub spend: f64,
    /// Campaign-level revenue (currency).
    pub revenue: f64,
    /// Audience slices. Each entry apportions the campaign totals
    /// independently by `percentage_of_audience`.
    #[serde(default)]
    pub demographic_breakdown: Vec<DemographicBreakdown>,
    /// Per-device figures, already apportioned.
    #[serde(default)]
    pub device_performance: Vec<DevicePerformance>,
    /// Per-region figures, already apportioned.
    #[serde(default)]
    pub regional_performance: Vec<RegionalPerformance>,
    /// Per-week figures, already apportioned.
    #[serde(default)]
    pub weekly_performance: Vec<WeeklyPerformance>,
}

impl Campaign {
    /// Campaign-level money totals.
    #[must_use]
    pub const fn money(&self) -> Money {
        Money {
            spend: self.spend,
            revenue: self.revenue,
        }
    }
}

/// Raw count metrics reported by a breakdown entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Performance {
    /// Ad impressions.
    pub impressions: u64,
    /// Ad clicks.
    pub clicks: u64,
    /// Conversions attributed to the clicks.
    pub conversions: u64,
}

/// Spend and revenue carried together so apportionment scales both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// Spend (currency).
    pub spend: f64,
    /// Revenue (currency).
    pub revenue: f64,
}

impl Money {
    /// Both amounts multiplied by `weight`.
    #[must_use]
    pub fn scaled(self, weight: f64) -> Self {
        Self {
            spend: self.spend * weight,
            revenue: self.revenue * weight,
        }
    }
}

/// One audience slice of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    /// Gender label, matched exactly (e.g. `"Male"`, `"Female"`).
    pub gender: String,
    /// Age group label, matched exactly (e.g. `"18-24"`).
    pub age_group: String,
    /// Share of the campaign audience in `[0, 100]`.
    pub percentage_of_audience: f64,
    /// Counts reported for this slice. Never scaled by the percentage.
    pub performance: Performance,
}

/// Figures for one device class within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePerformance {
    /// Device label. Only `"Mobile"` and `"Desktop"` are recognized.
    pub device: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

/// Figures for one region within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPerformance {
    pub region: String,
    pub revenue: f64,
    pub spend: f64,
}

/// Figures for one week within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    /// ISO date of the first day of the week (`YYYY-MM-DD`).
    pub week_start: String,
    pub revenue: f64,
    pub spend: f64,
}

/// The fixed device buckets recognized by the device view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    Mobile,
    Desktop,
}

impl Device {
    /// All buckets in display order.
    pub const ALL: [Self; 2] = [Self::Mobile, Self::Desktop];

    /// Labels of [`Self::ALL`], in the same order.
    pub const LABELS: [&'static str; 2] = [Self::Mobile.label(), Self::Desktop.label()];

    /// The exact label used in the dataset.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }

    /// Exact-match lookup; any other label yields `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// Accumulated totals for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub revenue: f64,
}

impl GroupTotals {
    /// Add raw counts and already-weighted money.
    pub fn add(&mut self, counts: Performance, money: Money) {
        self.impressions = self.impressions.saturating_add(counts.impressions);
        self.clicks = self.clicks.saturating_add(counts.clicks);
        self.conversions = self.conversions.saturating_add(counts.conversions);
        self.spend += money.spend;
        self.revenue += money.revenue;
    }
}

/// One `(label, value)` entry of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Category label or x value (e.g. an age group or a week start).
    pub label: String,
    /// Numeric value plotted for the label.
    pub value: f64,
}

impl SeriesPoint {
    /// Create a new series point.
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// An ordered sequence of labelled values handed to the chart layer.
///
/// Order is chronological for line charts and preserved as-is for bar
/// charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries(Vec<SeriesPoint>);

impl ChartSeries {
    /// Create a new series from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<SeriesPoint>) -> Self {
        Self(points)
    }

    /// Returns `true` if the series has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the series.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    /// Iterate over the values only.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|p| p.value)
    }

    /// Consumes the series and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<SeriesPoint> {
        self.0
    }
}

impl FromIterator<SeriesPoint> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = SeriesPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
