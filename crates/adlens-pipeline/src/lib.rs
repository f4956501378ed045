//! adlens-pipeline: Pure campaign aggregation pipeline (sans-IO).
//!
//! Turns a nested [`MarketingData`] document into the grouped, derived
//! and ordered series behind each dashboard view:
//! dimension aggregation -> rate derivation -> per-view shaping.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! datasets and returns structured data. Loading lives in `adlens-io`
//! and chart geometry in `adlens-export`.

pub mod aggregate;
pub mod cache;
pub mod diagnostics;
pub mod metrics;
pub mod types;
pub mod views;

use serde::Serialize;

pub use aggregate::{Dimension, DimensionExtractor, Grouped, aggregate};
pub use cache::ViewCache;
pub use metrics::{DerivedRates, Multiple, Percent, derive_rates};
pub use types::{
    Campaign, ChartSeries, DemographicBreakdown, Device, DevicePerformance, GroupTotals,
    MarketingData, Money, Performance, RegionalPerformance, SeriesPoint, WeeklyPerformance,
};
pub use views::{DemographicView, DeviceView, RegionView, WeeklyView};

/// Every view the dashboard renders, built from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub demographic: DemographicView,
    pub device: DeviceView,
    pub region: RegionView,
    pub weekly: WeeklyView,
}

/// Build all dashboard views from a dataset.
///
/// Each view is a pure function of the campaign list; building twice
/// from equal inputs yields equal views.
///
/// # Examples
///
/// ```
/// use adlens_pipeline::{MarketingData, build_views};
///
/// let views = build_views(&MarketingData::default());
/// assert_eq!(views.device.rows.len(), 2);
/// assert!(views.weekly.revenue.is_empty());
/// ```
#[must_use]
pub fn build_views(data: &MarketingData) -> DashboardViews {
    let campaigns = data.campaigns.as_slice();
    tracing::debug!(campaigns = campaigns.len(), "building dashboard views");
    DashboardViews {
        demographic: DemographicView::build(campaigns),
        device: DeviceView::build(campaigns),
        region: RegionView::build(campaigns),
        weekly: WeeklyView::build(campaigns),
    }
}
