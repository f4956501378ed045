//! Chart configuration for every dashboard chart.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::bar::BarChartConfig;
use crate::bubble::BubbleMapConfig;
use crate::color::{Rgb, palette};
use crate::line::LineChartConfig;
use crate::region::RegionMapConfig;

/// Fill colors for the bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarPalette {
    pub spend: Rgb,
    pub revenue: Rgb,
    pub mobile: Rgb,
    pub desktop: Rgb,
}

impl Default for BarPalette {
    fn default() -> Self {
        Self {
            spend: palette::BLUE,
            revenue: palette::GREEN,
            mobile: palette::BLUE,
            desktop: palette::GREEN,
        }
    }
}

/// Configuration for the whole chart set.
///
/// Deserialization applies the JSON as a patch over
/// [`ChartConfigs::default`]: any field absent from the input, at any
/// depth, keeps the value of the default chart set. A partial override
/// such as `{"region_spend": {"zoom": 5}}` therefore keeps the spend
/// map's own colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfigs {
    pub weekly_revenue: LineChartConfig,
    pub weekly_spend: LineChartConfig,
    pub bar: BarChartConfig,
    pub bar_palette: BarPalette,
    pub bubble: BubbleMapConfig,
    pub region_revenue: RegionMapConfig,
    pub region_spend: RegionMapConfig,
}

impl Default for ChartConfigs {
    fn default() -> Self {
        Self {
            weekly_revenue: LineChartConfig::with_stroke(palette::GREEN),
            weekly_spend: LineChartConfig::with_stroke(palette::BLUE),
            bar: BarChartConfig::default(),
            bar_palette: BarPalette::default(),
            bubble: BubbleMapConfig::default(),
            region_revenue: RegionMapConfig::revenue(),
            region_spend: RegionMapConfig::spend(),
        }
    }
}

/// Field-for-field mirror of [`ChartConfigs`] used once the patch has
/// been merged and every field is present.
#[derive(Deserialize)]
struct Merged {
    weekly_revenue: LineChartConfig,
    weekly_spend: LineChartConfig,
    bar: BarChartConfig,
    bar_palette: BarPalette,
    bubble: BubbleMapConfig,
    region_revenue: RegionMapConfig,
    region_spend: RegionMapConfig,
}

impl From<Merged> for ChartConfigs {
    fn from(m: Merged) -> Self {
        Self {
            weekly_revenue: m.weekly_revenue,
            weekly_spend: m.weekly_spend,
            bar: m.bar,
            bar_palette: m.bar_palette,
            bubble: m.bubble,
            region_revenue: m.region_revenue,
            region_spend: m.region_spend,
        }
    }
}

/// Recursively overwrite `base` with `patch`. Objects merge key by key;
/// any other patch value replaces the base value.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

impl<'de> Deserialize<'de> for ChartConfigs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        let patch = Value::deserialize(deserializer)?;
        if !patch.is_object() {
            return Err(D::Error::custom("chart configuration must be a JSON object"));
        }
        let mut merged = serde_json::to_value(Self::default()).map_err(D::Error::custom)?;
        merge(&mut merged, patch);
        serde_json::from_value::<Merged>(merged)
            .map(Self::from)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let config = ChartConfigs::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ChartConfigs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r##"{"bubble": {"fallback_radius": 6.0}, "weekly_spend": {"stroke": "#EC4899"}}"##;
        let config: ChartConfigs = serde_json::from_str(json).unwrap();
        assert!((config.bubble.fallback_radius - 6.0).abs() < f64::EPSILON);
        assert!((config.bubble.base_radius - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.weekly_spend.stroke, palette::PINK);
        assert!((config.weekly_spend.width - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.weekly_revenue.stroke, palette::GREEN);
    }

    #[test]
    fn partial_override_keeps_chart_presets() {
        let config: ChartConfigs =
            serde_json::from_str(r#"{"region_spend": {"zoom": 5}, "weekly_revenue": {"width": 600}}"#)
                .unwrap();
        assert_eq!(config.region_spend.zoom, 5);
        assert_eq!(config.region_spend.high_color, palette::BLUE);
        assert_eq!(config.region_spend.low_color, palette::PINK);
        assert!((config.weekly_revenue.width - 600.0).abs() < f64::EPSILON);
        assert_eq!(config.weekly_revenue.stroke, palette::GREEN);
        assert_eq!(config.region_revenue, RegionMapConfig::revenue());
    }

    #[test]
    fn nested_patch_replaces_only_named_leaves() {
        let config: ChartConfigs =
            serde_json::from_str(r#"{"weekly_spend": {"padding": {"left": 80}}}"#).unwrap();
        let defaults = ChartConfigs::default();
        assert!((config.weekly_spend.padding.left - 80.0).abs() < f64::EPSILON);
        assert!(
            (config.weekly_spend.padding.top - defaults.weekly_spend.padding.top).abs()
                < f64::EPSILON
        );
        assert_eq!(config.weekly_spend.stroke, palette::BLUE);
    }

    #[test]
    fn non_object_config_is_rejected() {
        assert!(serde_json::from_str::<ChartConfigs>("[]").is_err());
        assert!(serde_json::from_str::<ChartConfigs>(r#"{"bar": {"width": "wide"}}"#).is_err());
    }

    #[test]
    fn invalid_color_is_rejected() {
        let json = r#"{"bar_palette": {"spend": "blue"}}"#;
        assert!(serde_json::from_str::<ChartConfigs>(json).is_err());
    }

    #[test]
    fn region_presets_differ() {
        let config = ChartConfigs::default();
        assert_eq!(config.region_revenue.low_color, palette::AMBER);
        assert_eq!(config.region_spend.low_color, palette::PINK);
        assert_eq!(config.region_spend.zoom, 4);
    }
}
