//! Dimension aggregation: fold campaigns into per-key totals.
//!
//! This module defines the [`DimensionExtractor`] trait for pluggable
//! extraction rules and the [`Dimension`] enum for selecting which
//! breakdown to group by at runtime.
//!
//! # Weighting
//!
//! Every extractor emits [`Contribution`]s carrying a money base and a
//! weight. The weight scales money only: counts are always added as
//! reported. Demographic slices therefore contribute
//! `campaign.spend * percentage_of_audience / 100` while their
//! impressions, clicks and conversions are taken verbatim. Device,
//! regional and weekly entries are already apportioned and use weight
//! `1.0` with their own money figures as the base.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::types::{Campaign, Device, GroupTotals, Money, Performance};

/// One `(key, weight, metrics)` tuple pulled out of a campaign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution<'a> {
    /// Grouping key, borrowed verbatim from the campaign.
    pub key: &'a str,
    /// Multiplier applied to `money` (never to `counts`).
    pub weight: f64,
    /// Raw counts, added unweighted.
    pub counts: Performance,
    /// Money base, added as `money * weight`.
    pub money: Money,
}

/// Which keys an aggregation is allowed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Any key encountered gets its own group, in first-encounter order.
    Open,
    /// Exactly these groups exist, pre-seeded with zeros in this order.
    /// Contributions under any other key are ignored.
    Fixed(&'static [&'static str]),
}

/// Selects which breakdown of a campaign to group by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    /// Demographic slices keyed by gender.
    Gender,
    /// Demographic slices keyed by age group, across all genders.
    AgeGroup,
    /// Demographic slices of one gender, keyed by age group.
    AgeGroupForGender(String),
    /// Device entries keyed by device, limited to [`Device::ALL`].
    Device,
    /// Regional entries keyed by region name.
    Region,
    /// Weekly entries keyed by `week_start`.
    Week,
}

/// Trait for dimension extraction strategies.
///
/// Input: one campaign.
/// Output: zero or more contributions appended to `out`.
pub trait DimensionExtractor {
    /// Append this campaign's contributions to `out`.
    fn extract<'c>(&self, campaign: &'c Campaign, out: &mut Vec<Contribution<'c>>);

    /// Which keys the aggregation may produce.
    fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::Open
    }
}

impl DimensionExtractor for Dimension {
    fn extract<'c>(&self, campaign: &'c Campaign, out: &mut Vec<Contribution<'c>>) {
        match self {
            Self::Gender => extract_demographic(campaign, out, |b| Some(b.gender.as_str())),
            Self::AgeGroup => extract_demographic(campaign, out, |b| Some(b.age_group.as_str())),
            Self::AgeGroupForGender(gender) => extract_demographic(campaign, out, |b| {
                (b.gender == *gender).then_some(b.age_group.as_str())
            }),
            Self::Device => out.extend(campaign.device_performance.iter().map(|d| Contribution {
                key: d.device.as_str(),
                weight: 1.0,
                counts: Performance {
                    impressions: d.impressions,
                    clicks: d.clicks,
                    conversions: d.conversions,
                },
                money: Money {
                    spend: d.spend,
                    revenue: d.revenue,
                },
            })),
            Self::Region => out.extend(campaign.regional_performance.iter().map(|r| {
                money_only(
                    r.region.as_str(),
                    Money {
                        spend: r.spend,
                        revenue: r.revenue,
                    },
                )
            })),
            Self::Week => out.extend(campaign.weekly_performance.iter().map(|w| {
                money_only(
                    w.week_start.as_str(),
                    Money {
                        spend: w.spend,
                        revenue: w.revenue,
                    },
                )
            })),
        }
    }

    fn key_policy(&self) -> KeyPolicy {
        match self {
            Self::Device => KeyPolicy::Fixed(&Device::LABELS),
            _ => KeyPolicy::Open,
        }
    }
}

/// Demographic slices apportion the campaign money by audience share.
fn extract_demographic<'c>(
    campaign: &'c Campaign,
    out: &mut Vec<Contribution<'c>>,
    key_of: impl Fn(&'c crate::types::DemographicBreakdown) -> Option<&'c str>,
) {
    let money = campaign.money();
    out.extend(campaign.demographic_breakdown.iter().filter_map(|b| {
        key_of(b).map(|key| Contribution {
            key,
            weight: b.percentage_of_audience / 100.0,
            counts: b.performance,
            money,
        })
    }));
}

const fn money_only(key: &str, money: Money) -> Contribution<'_> {
    Contribution {
        key,
        weight: 1.0,
        counts: Performance {
            impressions: 0,
            clicks: 0,
            conversions: 0,
        },
        money,
    }
}

/// Totals for a single key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub key: String,
    pub totals: GroupTotals,
}

/// Grouped totals in first-encounter order (or fixed-key order).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Grouped {
    groups: Vec<Group>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Grouped {
    fn seeded(keys: &[&str]) -> Self {
        let mut grouped = Self::default();
        for key in keys {
            grouped.entry(key);
        }
        grouped
    }

    fn entry(&mut self, key: &str) -> &mut GroupTotals {
        let idx = if let Some(&idx) = self.index.get(key) {
            idx
        } else {
            let idx = self.groups.len();
            self.groups.push(Group {
                key: key.to_owned(),
                totals: GroupTotals::default(),
            });
            self.index.insert(key.to_owned(), idx);
            idx
        };
        &mut self.groups[idx].totals
    }

    /// Totals for `key`, if any contribution (or seeding) created it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GroupTotals> {
        self.index.get(key).map(|&idx| &self.groups[idx].totals)
    }

    /// All groups in order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no group exists.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over `(key, totals)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupTotals)> {
        self.groups.iter().map(|g| (g.key.as_str(), &g.totals))
    }

    /// Key-sorted view, independent of encounter order.
    #[must_use]
    pub fn to_sorted_map(&self) -> BTreeMap<&str, GroupTotals> {
        self.iter().map(|(k, t)| (k, *t)).collect()
    }
}

/// Fold `campaigns` into per-key totals using `extractor`.
///
/// Groups are created lazily on first encounter and never removed
/// within the pass. Under [`KeyPolicy::Fixed`] the fixed groups always
/// exist (possibly all zero) and unknown keys are dropped.
///
/// No validation is performed: NaN or negative money propagates into
/// the totals arithmetically.
///
/// # Examples
///
/// ```
/// use adlens_pipeline::aggregate::{Dimension, aggregate};
/// use adlens_pipeline::{Campaign, DemographicBreakdown, Performance};
///
/// let campaign = Campaign {
///     spend: 100.0,
///     revenue: 300.0,
///     demographic_breakdown: vec![DemographicBreakdown {
///         gender: "Female".into(),
///         age_group: "25-34".into(),
///         percentage_of_audience: 50.0,
///         performance: Performance { impressions: 800, clicks: 40, conversions: 4 },
///     }],
///     ..Campaign::default()
/// };
/// let grouped = aggregate(&[campaign], &Dimension::Gender);
/// let female = grouped.get("Female").unwrap();
/// assert_eq!(female.spend, 50.0);
/// assert_eq!(female.impressions, 800);
/// ```
#[must_use]
pub fn aggregate<E: DimensionExtractor + ?Sized>(campaigns: &[Campaign], extractor: &E) -> Grouped {
    let policy = extractor.key_policy();
    let mut grouped = match policy {
        KeyPolicy::Open => Grouped::default(),
        KeyPolicy::Fixed(keys) => Grouped::seeded(keys),
    };

    let mut contributions = Vec::new();
    for campaign in campaigns {
        contributions.clear();
        extractor.extract(campaign, &mut contributions);

        for c in &contributions {
            let totals = match policy {
                KeyPolicy::Open => grouped.entry(c.key),
                KeyPolicy::Fixed(keys) if keys.contains(&c.key) => grouped.entry(c.key),
                KeyPolicy::Fixed(_) => {
                    tracing::trace!(key = c.key, "ignoring key outside the fixed buckets");
                    continue;
                }
            };
            totals.add(c.counts, c.money.scaled(c.weight));
        }
    }

    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::{
        DemographicBreakdown, DevicePerformance, RegionalPerformance, WeeklyPerformance,
    };

    fn slice(gender: &str, age: &str, pct: f64, imp: u64, clicks: u64, conv: u64) -> DemographicBreakdown {
        DemographicBreakdown {
            gender: gender.to_owned(),
            age_group: age.to_owned(),
            percentage_of_audience: pct,
            performance: Performance {
                impressions: imp,
                clicks,
                conversions: conv,
            },
        }
    }

    fn device(label: &str, imp: u64, spend: f64, revenue: f64) -> DevicePerformance {
        DevicePerformance {
            device: label.to_owned(),
            impressions: imp,
            clicks: imp / 10,
            conversions: imp / 100,
            spend,
            revenue,
        }
    }

    fn campaign(spend: f64, revenue: f64, slices: Vec<DemographicBreakdown>) -> Campaign {
        Campaign {
            spend,
            revenue,
            demographic_breakdown: slices,
            ..Campaign::default()
        }
    }

    // --- Apportionment ---

    #[test]
    fn demographic_money_is_apportioned_counts_are_not() {
        let c = campaign(100.0, 40.0, vec![slice("Male", "18-24", 50.0, 1000, 100, 10)]);
        let grouped = aggregate(&[c], &Dimension::Gender);
        let male = grouped.get("Male").unwrap();
        assert!((male.spend - 50.0).abs() < f64::EPSILON);
        assert!((male.revenue - 20.0).abs() < f64::EPSILON);
        assert_eq!(male.impressions, 1000);
        assert_eq!(male.clicks, 100);
        assert_eq!(male.conversions, 10);
    }

    #[test]
    fn percentages_over_100_are_not_normalized() {
        let c = campaign(
            100.0,
            100.0,
            vec![
                slice("Male", "18-24", 80.0, 1, 1, 1),
                slice("Male", "25-34", 80.0, 1, 1, 1),
            ],
        );
        let grouped = aggregate(&[c], &Dimension::Gender);
        let male = grouped.get("Male").unwrap();
        assert!((male.spend - 160.0).abs() < 1e-9);
        assert_eq!(male.impressions, 2);
    }

    #[test]
    fn zero_percentage_adds_counts_but_no_money() {
        let c = campaign(500.0, 900.0, vec![slice("Female", "35-44", 0.0, 300, 30, 3)]);
        let grouped = aggregate(&[c], &Dimension::AgeGroup);
        let group = grouped.get("35-44").unwrap();
        assert!(group.spend.abs() < f64::EPSILON);
        assert!(group.revenue.abs() < f64::EPSILON);
        assert_eq!(group.impressions, 300);
    }

    #[test]
    fn nan_money_propagates() {
        let c = campaign(f64::NAN, 10.0, vec![slice("Male", "18-24", 50.0, 1, 1, 1)]);
        let grouped = aggregate(&[c], &Dimension::Gender);
        assert!(grouped.get("Male").unwrap().spend.is_nan());
    }

    // --- Keys ---

    #[test]
    fn unknown_gender_keeps_literal_key() {
        let c = campaign(
            10.0,
            10.0,
            vec![
                slice("Male", "18-24", 50.0, 1, 1, 1),
                slice("Non-binary", "18-24", 50.0, 1, 1, 1),
            ],
        );
        let grouped = aggregate(&[c], &Dimension::Gender);
        assert_eq!(grouped.len(), 2);
        assert!(grouped.get("Non-binary").is_some());
    }

    #[test]
    fn keys_are_not_normalized() {
        let c = campaign(
            10.0,
            10.0,
            vec![
                slice("Male", "18-24", 50.0, 1, 1, 1),
                slice("male", "18-24", 50.0, 1, 1, 1),
            ],
        );
        let grouped = aggregate(&[c], &Dimension::Gender);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn groups_follow_first_encounter_order() {
        let c = campaign(
            10.0,
            10.0,
            vec![
                slice("Male", "45-54", 10.0, 1, 1, 1),
                slice("Male", "18-24", 10.0, 1, 1, 1),
                slice("Female", "45-54", 10.0, 1, 1, 1),
            ],
        );
        let grouped = aggregate(&[c], &Dimension::AgeGroup);
        let keys: Vec<&str> = grouped.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["45-54", "18-24"]);
    }

    #[test]
    fn age_group_for_gender_filters_other_genders() {
        let c = campaign(
            100.0,
            100.0,
            vec![
                slice("Male", "18-24", 50.0, 100, 10, 1),
                slice("Female", "18-24", 50.0, 200, 20, 2),
            ],
        );
        let grouped = aggregate(&[c], &Dimension::AgeGroupForGender("Female".to_owned()));
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get("18-24").unwrap().impressions, 200);
    }

    // --- Device fixed buckets ---

    #[test]
    fn device_buckets_exist_without_data() {
        let grouped = aggregate(&[], &Dimension::Device);
        let keys: Vec<&str> = grouped.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Mobile", "Desktop"]);
        assert_eq!(grouped.get("Mobile").unwrap(), &GroupTotals::default());
    }

    #[test]
    fn unknown_device_contributes_nothing() {
        let c = Campaign {
            device_performance: vec![
                device("Mobile", 1000, 10.0, 20.0),
                device("Tablet", 5000, 50.0, 90.0),
                device("Desktop", 2000, 30.0, 60.0),
            ],
            ..Campaign::default()
        };
        let grouped = aggregate(&[c], &Dimension::Device);
        assert_eq!(grouped.len(), 2);
        assert!(grouped.get("Tablet").is_none());
        let mobile = grouped.get("Mobile").unwrap();
        let desktop = grouped.get("Desktop").unwrap();
        assert_eq!(mobile.impressions, 1000);
        assert_eq!(desktop.impressions, 2000);
        assert!((mobile.spend - 10.0).abs() < f64::EPSILON);
        assert!((desktop.revenue - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn device_money_is_not_reweighted() {
        let c = Campaign {
            spend: 9999.0,
            revenue: 9999.0,
            device_performance: vec![device("Mobile", 10, 12.5, 40.0)],
            ..Campaign::default()
        };
        let grouped = aggregate(&[c], &Dimension::Device);
        let mobile = grouped.get("Mobile").unwrap();
        assert!((mobile.spend - 12.5).abs() < f64::EPSILON);
        assert!((mobile.revenue - 40.0).abs() < f64::EPSILON);
    }

    // --- Region / week ---

    #[test]
    fn region_and_week_sum_money_only() {
        let a = Campaign {
            regional_performance: vec![RegionalPerformance {
                region: "Dubai".to_owned(),
                revenue: 100.0,
                spend: 40.0,
            }],
            weekly_performance: vec![WeeklyPerformance {
                week_start: "2024-01-01".to_owned(),
                revenue: 70.0,
                spend: 30.0,
            }],
            ..Campaign::default()
        };
        let b = a.clone();
        let regions = aggregate(&[a.clone(), b.clone()], &Dimension::Region);
        let dubai = regions.get("Dubai").unwrap();
        assert!((dubai.revenue - 200.0).abs() < f64::EPSILON);
        assert!((dubai.spend - 80.0).abs() < f64::EPSILON);
        assert_eq!(dubai.impressions, 0);

        let weeks = aggregate(&[a, b], &Dimension::Week);
        assert_eq!(weeks.len(), 1);
        assert!((weeks.get("2024-01-01").unwrap().revenue - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_extractor_is_accepted() {
        struct Everything;
        impl DimensionExtractor for Everything {
            fn extract<'c>(&self, campaign: &'c Campaign, out: &mut Vec<Contribution<'c>>) {
                out.push(money_only("all", campaign.money()));
            }
        }
        let campaigns = vec![campaign(1.0, 2.0, vec![]), campaign(3.0, 4.0, vec![])];
        let grouped = aggregate(&campaigns, &Everything);
        assert!((grouped.get("all").unwrap().revenue - 6.0).abs() < f64::EPSILON);
    }

    // --- Order independence ---

    fn arb_campaign() -> impl Strategy<Value = Campaign> {
        let genders = prop::sample::select(vec!["Male", "Female", "Other"]);
        let ages = prop::sample::select(vec!["18-24", "25-34", "35-44"]);
        // Whole-number money with 0% / 100% shares keeps every partial
        // sum exact, so any order of addition yields identical totals.
        let shares = prop::sample::select(vec![0.0, 100.0]);
        let slice_strategy = (genders, ages, shares, 0u64..10_000, 0u64..1_000, 0u64..100)
            .prop_map(|(g, a, pct, imp, clicks, conv)| slice(g, a, pct, imp, clicks, conv));
        let device_strategy = (
            prop::sample::select(vec!["Mobile", "Desktop", "Tablet"]),
            0u64..10_000,
            0u32..10_000,
            0u32..10_000,
        )
            .prop_map(|(d, imp, spend, revenue)| {
                device(d, imp, f64::from(spend), f64::from(revenue))
            });
        let region_strategy = (
            prop::sample::select(vec!["Dubai", "Cairo", "Lisbon"]),
            0u32..10_000,
            0u32..10_000,
        )
            .prop_map(|(region, revenue, spend)| RegionalPerformance {
                region: region.to_owned(),
                revenue: f64::from(revenue),
                spend: f64::from(spend),
            });
        let week_strategy = (
            prop::sample::select(vec!["2024-03-04", "2024-03-11", "not-a-date"]),
            0u32..10_000,
            0u32..10_000,
        )
            .prop_map(|(week_start, revenue, spend)| WeeklyPerformance {
                week_start: week_start.to_owned(),
                revenue: f64::from(revenue),
                spend: f64::from(spend),
            });
        (
            0u32..100_000,
            0u32..100_000,
            prop::collection::vec(slice_strategy, 0..4),
            prop::collection::vec(device_strategy, 0..3),
            prop::collection::vec(region_strategy, 0..3),
            prop::collection::vec(week_strategy, 0..3),
        )
            .prop_map(|(spend, revenue, slices, devices, regions, weeks)| Campaign {
                device_performance: devices,
                regional_performance: regions,
                weekly_performance: weeks,
                ..campaign(f64::from(spend), f64::from(revenue), slices)
            })
    }

    /// A campaign list together with a permutation of it.
    fn arb_campaigns_and_permutation() -> impl Strategy<Value = (Vec<Campaign>, Vec<Campaign>)> {
        prop::collection::vec(arb_campaign(), 0..8).prop_flat_map(|campaigns| {
            let shuffled = Just(campaigns.clone()).prop_shuffle();
            (Just(campaigns), shuffled)
        })
    }

    proptest! {
        #[test]
        fn aggregation_is_order_independent(
            (campaigns, shuffled) in arb_campaigns_and_permutation(),
        ) {
            for dim in [
                Dimension::Gender,
                Dimension::AgeGroup,
                Dimension::AgeGroupForGender("Female".to_owned()),
                Dimension::Device,
                Dimension::Region,
                Dimension::Week,
            ] {
                let original = aggregate(&campaigns, &dim);
                let permuted = aggregate(&shuffled, &dim);
                prop_assert_eq!(original.to_sorted_map(), permuted.to_sorted_map());
            }
        }
    }
}
