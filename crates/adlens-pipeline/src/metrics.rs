//! Rate metrics derived from grouped totals.
//!
//! Every rate is defined only when its denominator is positive. A zero
//! (or NaN) denominator yields a rate of exactly zero, which formats as
//! `0.00%` or `0.00x`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::GroupTotals;

/// A fraction displayed as a percentage with two decimals (`0.1` -> `10.00%`).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Percent(pub f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

/// A ratio displayed with two decimals and an `x` suffix (`2.5` -> `2.50x`).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Multiple(pub f64);

impl fmt::Display for Multiple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

// Rates cross the rendering boundary as their display strings.
impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Multiple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// CTR, conversion rate and ROAS for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedRates {
    /// `clicks / impressions`.
    pub ctr: Percent,
    /// `conversions / clicks`.
    pub conversion_rate: Percent,
    /// `revenue / spend`.
    pub roas: Multiple,
}

/// `numerator / denominator`, or `0.0` unless the denominator is positive.
#[must_use]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_ratio(numerator: u64, denominator: u64) -> f64 {
    guarded_ratio(numerator as f64, denominator as f64)
}

/// Derive all rate metrics from grouped totals.
///
/// Total on its domain: never panics and never returns NaN for a zero
/// denominator.
///
/// # Examples
///
/// ```
/// use adlens_pipeline::GroupTotals;
/// use adlens_pipeline::metrics::derive_rates;
///
/// let rates = derive_rates(&GroupTotals::default());
/// assert_eq!(rates.ctr.to_string(), "0.00%");
/// assert_eq!(rates.conversion_rate.to_string(), "0.00%");
/// assert_eq!(rates.roas.to_string(), "0.00x");
/// ```
#[must_use]
pub fn derive_rates(totals: &GroupTotals) -> DerivedRates {
    DerivedRates {
        ctr: Percent(count_ratio(totals.clicks, totals.impressions)),
        conversion_rate: Percent(count_ratio(totals.conversions, totals.clicks)),
        roas: Multiple(guarded_ratio(totals.revenue, totals.spend)),
    }
}
