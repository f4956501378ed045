//! Recompute-on-change memoization of the dashboard views.
//!
//! The cache is keyed on a SipHash fingerprint of the dataset contents,
//! so handing it an equal dataset returns the stored views while any
//! change triggers a full rebuild. Rebuilding from scratch always yields
//! the same views as a cache hit.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::DashboardViews;
use crate::types::{Campaign, MarketingData};

/// Content fingerprint of a dataset.
#[must_use]
pub fn fingerprint(data: &MarketingData) -> u64 {
    let mut hasher = SipHasher13::new();
    data.campaigns.len().hash(&mut hasher);
    for campaign in &data.campaigns {
        hash_campaign(campaign, &mut hasher);
    }
    hasher.finish()
}

fn hash_f64(value: f64, hasher: &mut impl Hasher) {
    hasher.write_u64(value.to_bits());
}

fn hash_campaign(campaign: &Campaign, hasher: &mut impl Hasher) {
    campaign.name.hash(hasher);
    hash_f64(campaign.spend, hasher);
    hash_f64(campaign.revenue, hasher);

    campaign.demographic_breakdown.len().hash(hasher);
    for b in &campaign.demographic_breakdown {
        b.gender.hash(hasher);
        b.age_group.hash(hasher);
        hash_f64(b.percentage_of_audience, hasher);
        b.performance.hash(hasher);
    }

    campaign.device_performance.len().hash(hasher);
    for d in &campaign.device_performance {
        d.device.hash(hasher);
        (d.impressions, d.clicks, d.conversions).hash(hasher);
        hash_f64(d.spend, hasher);
        hash_f64(d.revenue, hasher);
    }

    campaign.regional_performance.len().hash(hasher);
    for r in &campaign.regional_performance {
        r.region.hash(hasher);
        hash_f64(r.spend, hasher);
        hash_f64(r.revenue, hasher);
    }

    campaign.weekly_performance.len().hash(hasher);
    for w in &campaign.weekly_performance {
        w.week_start.hash(hasher);
        hash_f64(w.spend, hasher);
        hash_f64(w.revenue, hasher);
    }
}

/// Holds the views built for the most recent dataset.
#[derive(Debug, Default)]
pub struct ViewCache {
    entry: Option<(u64, DashboardViews)>,
    builds: usize,
}

impl ViewCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Views for `data`, rebuilding only when its fingerprint changed.
    pub fn get_or_build(&mut self, data: &MarketingData) -> &DashboardViews {
        let fingerprint = fingerprint(data);
        let hit = matches!(&self.entry, Some((fp, _)) if *fp == fingerprint);
        if hit {
            tracing::debug!(fingerprint, "view cache hit");
        } else {
            tracing::debug!(fingerprint, "view cache miss, rebuilding");
            self.entry = None;
            self.builds += 1;
        }
        let (_, views) = self
            .entry
            .get_or_insert_with(|| (fingerprint, crate::build_views(data)));
        views
    }

    /// Number of full rebuilds performed so far.
    #[must_use]
    pub const fn builds(&self) -> usize {
        self.builds
    }

    /// Drop the stored views.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}
