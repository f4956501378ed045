//! View-building diagnostics: timing and group counts for each view.
//!
//! Every call to [`build_views_with_diagnostics`] collects diagnostics
//! alongside the built views. Timestamps come from a [`Clock`]; the
//! default [`SystemClock`] uses the `web-time` crate, which maps to
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Device, MarketingData};
use crate::views::{DemographicView, DeviceView, RegionView, WeeklyView, parse_week_start};
use crate::DashboardViews;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque instant type.
    type Instant;

    /// Capture the current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Diagnostics collected from building every view once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDiagnostics {
    /// Demographic view (three aggregation passes plus two tables).
    pub demographic: StageDiagnostics,
    /// Device view.
    pub device: StageDiagnostics,
    /// Region view.
    pub region: StageDiagnostics,
    /// Weekly view.
    pub weekly: StageDiagnostics,
    /// Total wall-clock duration of the whole build (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across the dataset.
    pub summary: DatasetSummary,
}

/// Diagnostics for a single view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this view (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// View-specific counts.
    pub metrics: StageMetrics,
}

/// View-specific counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    Demographic {
        /// Rows in the age-group series.
        age_group_count: usize,
        /// Rows in the male table.
        male_rows: usize,
        /// Rows in the female table.
        female_rows: usize,
    },
    Device {
        /// Fixed buckets reported (always two).
        bucket_count: usize,
        /// Device entries whose label matched no bucket.
        ignored_entries: usize,
    },
    Region {
        /// Distinct regions.
        region_count: usize,
    },
    Weekly {
        /// Distinct weeks.
        week_count: usize,
        /// Weeks whose label did not parse as a date.
        undated_weeks: usize,
    },
}

/// High-level counts for the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub campaign_count: usize,
    pub demographic_entries: usize,
    pub device_entries: usize,
    pub regional_entries: usize,
    pub weekly_entries: usize,
}

impl DatasetSummary {
    fn of(data: &MarketingData) -> Self {
        let count = |f: fn(&crate::Campaign) -> usize| data.campaigns.iter().map(f).sum();
        Self {
            campaign_count: data.campaigns.len(),
            demographic_entries: count(|c| c.demographic_breakdown.len()),
            device_entries: count(|c| c.device_performance.len()),
            regional_entries: count(|c| c.regional_performance.len()),
            weekly_entries: count(|c| c.weekly_performance.len()),
        }
    }
}

/// Build every view, timing each one with `clock`.
///
/// The returned views are identical to [`crate::build_views`].
pub fn build_views_with_diagnostics<C: Clock>(
    data: &MarketingData,
    clock: &C,
) -> (DashboardViews, ViewDiagnostics) {
    let campaigns = data.campaigns.as_slice();
    let start = clock.now();

    let t = clock.now();
    let demographic = DemographicView::build(campaigns);
    let demographic_diag = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Demographic {
            age_group_count: demographic.spend_by_age_group.len(),
            male_rows: demographic.male_age_groups.len(),
            female_rows: demographic.female_age_groups.len(),
        },
    };

    let t = clock.now();
    let device = DeviceView::build(campaigns);
    let ignored_entries = campaigns
        .iter()
        .flat_map(|c| &c.device_performance)
        .filter(|d| Device::from_label(&d.device).is_none())
        .count();
    let device_diag = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Device {
            bucket_count: device.rows.len(),
            ignored_entries,
        },
    };

    let t = clock.now();
    let region = RegionView::build(campaigns);
    let region_diag = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Region {
            region_count: region.revenue.len(),
        },
    };

    let t = clock.now();
    let weekly = WeeklyView::build(campaigns);
    let undated_weeks = weekly
        .revenue
        .points()
        .iter()
        .filter(|p| parse_week_start(&p.label).is_none())
        .count();
    let weekly_diag = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Weekly {
            week_count: weekly.revenue.len(),
            undated_weeks,
        },
    };

    let diagnostics = ViewDiagnostics {
        demographic: demographic_diag,
        device: device_diag,
        region: region_diag,
        weekly: weekly_diag,
        total_duration: clock.elapsed(&start),
        summary: DatasetSummary::of(data),
    };
    let views = DashboardViews {
        demographic,
        device,
        region,
        weekly,
    };
    (views, diagnostics)
}

impl ViewDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("View Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Campaigns: {}  (demographic={} device={} regional={} weekly={} entries)",
            self.summary.campaign_count,
            self.summary.demographic_entries,
            self.summary.device_entries,
            self.summary.regional_entries,
            self.summary.weekly_entries,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "View", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in [
            ("Demographic", &self.demographic),
            ("Device", &self.device),
            ("Region", &self.region),
            ("Weekly", &self.weekly),
        ] {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format view metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Demographic {
            age_group_count,
            male_rows,
            female_rows,
        } => format!("{age_group_count} age groups, male={male_rows} female={female_rows} rows"),
        StageMetrics::Device {
            bucket_count,
            ignored_entries,
        } => format!("{bucket_count} buckets, {ignored_entries} ignored entries"),
        StageMetrics::Region { region_count } => format!("{region_count} regions"),
        StageMetrics::Weekly {
            week_count,
            undated_weeks,
        } => format!("{week_count} weeks ({undated_weeks} undated)"),
    }
}
