//! Value and label formatters for axis ticks, tooltips and bar labels.
//!
//! Charts accept any [`ValueFormatter`] (numbers) or [`LabelFormatter`]
//! (x labels). The built-in [`ValueFormat`] and [`LabelFormat`] enums
//! cover the dashboard's formats; plain closures work too.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use adlens_pipeline::Percent;
use adlens_pipeline::views::parse_week_start;

/// Formats a numeric value for display.
pub trait ValueFormatter {
    fn format_value(&self, value: f64) -> String;
}

impl<F: Fn(f64) -> String> ValueFormatter for F {
    fn format_value(&self, value: f64) -> String {
        self(value)
    }
}

/// Formats a category or x-axis label for display.
pub trait LabelFormatter {
    fn format_label(&self, label: &str) -> String;
}

impl<F: Fn(&str) -> String> LabelFormatter for F {
    fn format_label(&self, label: &str) -> String {
        self(label)
    }
}

/// Built-in numeric formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    /// `$1,235`
    #[default]
    CurrencyWhole,
    /// `$1,234.50`
    CurrencyCents,
    /// `$12k`
    Thousands,
    /// `12,345`
    GroupedInteger,
    /// Fraction as a percentage: `0.1234` -> `12.34%`
    Percent,
}

impl ValueFormatter for ValueFormat {
    fn format_value(&self, value: f64) -> String {
        match self {
            Self::CurrencyWhole => currency_whole(value),
            Self::CurrencyCents => currency_cents(value),
            Self::Thousands => thousands(value),
            Self::GroupedInteger => grouped_integer(value),
            Self::Percent => percent(value),
        }
    }
}

/// Built-in label formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    /// Label unchanged.
    #[default]
    Raw,
    /// Week-start dates as `Jan 5`.
    ShortDate,
}

impl LabelFormatter for LabelFormat {
    fn format_label(&self, label: &str) -> String {
        match self {
            Self::Raw => label.to_owned(),
            Self::ShortDate => short_date(label),
        }
    }
}

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format with `decimals` fraction digits and grouped thousands.
fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.decimals$}", value.abs());
    let (int, frac) = text.split_once('.').map_or((text.as_str(), None), |(i, f)| (i, Some(f)));
    let sign = if value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    frac.map_or_else(
        || format!("{sign}{}", group_digits(int)),
        |frac| format!("{sign}{}.{frac}", group_digits(int)),
    )
}

/// Whole currency: `1234.5` -> `$1,235`.
///
/// # Examples
///
/// ```
/// use adlens_export::format::currency_whole;
///
/// assert_eq!(currency_whole(1234.5), "$1,235");
/// ```
#[must_use]
pub fn currency_whole(value: f64) -> String {
    format!("${}", grouped(value.round(), 0))
}

/// Currency with cents: `1234.5` -> `$1,234.50`.
#[must_use]
pub fn currency_cents(value: f64) -> String {
    format!("${}", grouped(value, 2))
}

/// Thousands of currency: `12345.0` -> `$12k`.
#[must_use]
pub fn thousands(value: f64) -> String {
    format!("${}k", grouped((value / 1000.0).round(), 0))
}

/// Grouped whole number: `12345.0` -> `12,345`.
#[must_use]
pub fn grouped_integer(value: f64) -> String {
    grouped(value.round(), 0)
}

/// Fraction as a two-decimal percentage: `0.1234` -> `12.34%`.
#[must_use]
pub fn percent(value: f64) -> String {
    Percent(value).to_string()
}

/// Short month-day date: `2024-01-05` -> `Jan 5`.
///
/// Labels that do not parse as a date are returned unchanged.
#[must_use]
pub fn short_date(label: &str) -> String {
    parse_week_start(label).map_or_else(|| label.to_owned(), |d: NaiveDate| d.format("%b %-d").to_string())
}
