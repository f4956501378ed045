//! Scales mapping data values onto output coordinates.
//!
//! Every scale is built from a series' value [`Extent`] and guards the
//! degenerate case (all values equal) instead of dividing by zero:
//!
//! | scale            | degenerate output              |
//! |------------------|--------------------------------|
//! | [`LinearScale`]  | range midpoint, or a fixed value |
//! | [`RadiusScale`]  | fallback radius                |
//! | [`crate::color::ColorScale`] | the high color     |
//!
//! [`IndexScale`] maps ordinal positions and instead refuses to exist
//! for fewer than two points.

use serde::{Deserialize, Serialize};

/// A value-to-output mapping.
pub trait Scale {
    /// Output type (coordinate, radius, color).
    type Output;

    /// Map one value.
    fn scale(&self, value: f64) -> Self::Output;
}

/// Closed interval `[min, max]` of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest and largest of `values`, or `None` when empty.
    ///
    /// NaN values are skipped unless every value is NaN.
    ///
    /// # Examples
    ///
    /// ```
    /// use adlens_export::scale::Extent;
    ///
    /// assert_eq!(Extent::of([20.0, 10.0, 30.0]), Some(Extent::new(10.0, 30.0)));
    /// assert_eq!(Extent::of(Vec::new()), None);
    /// ```
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| {
            Some(acc.map_or(Self::new(v, v), |e: Self| {
                Self::new(e.min.min(v), e.max.max(v))
            }))
        })
    }

    /// `max - min`.
    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// True when the interval has no usable width.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_degenerate(self) -> bool {
        self.max == self.min || self.span().is_nan()
    }

    /// Position of `value` within the interval (`0.0` at min, `1.0` at max).
    ///
    /// Callers check [`Self::is_degenerate`] first.
    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}

/// `start + (v - min) / (max - min) * (end - start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: Extent,
    start: f64,
    end: f64,
    degenerate: f64,
}

impl LinearScale {
    /// Scale `domain` onto `[start, end]`; a degenerate domain maps to
    /// the range midpoint.
    #[must_use]
    pub fn new(domain: Extent, start: f64, end: f64) -> Self {
        Self {
            domain,
            start,
            end,
            degenerate: f64::midpoint(start, end),
        }
    }

    /// Replace the output used for a degenerate domain.
    #[must_use]
    pub const fn with_degenerate_value(mut self, value: f64) -> Self {
        self.degenerate = value;
        self
    }

    #[must_use]
    pub const fn domain(&self) -> Extent {
        self.domain
    }
}

impl Scale for LinearScale {
    type Output = f64;

    fn scale(&self, value: f64) -> f64 {
        if self.domain.is_degenerate() {
            return self.degenerate;
        }
        self.domain
            .ratio(value)
            .mul_add(self.end - self.start, self.start)
    }
}

/// Maps ordinal index `i` in `[0, count - 1]` linearly onto `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexScale {
    last: usize,
    start: f64,
    end: f64,
}

impl IndexScale {
    /// `None` for fewer than two points: there is no line to draw.
    #[must_use]
    pub const fn new(count: usize, start: f64, end: f64) -> Option<Self> {
        if count < 2 {
            return None;
        }
        Some(Self {
            last: count - 1,
            start,
            end,
        })
    }

    /// Number of positions.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.last + 1
    }

    /// Output coordinate of position `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> f64 {
        let ratio = index as f64 / self.last as f64;
        ratio.mul_add(self.end - self.start, self.start)
    }
}

/// Logarithmic radius: `base + ln(1 + v / max) * factor`.
///
/// Returns `fallback` when the domain is degenerate or its maximum is
/// zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    max: f64,
    degenerate: bool,
    base: f64,
    factor: f64,
    fallback: f64,
}

impl RadiusScale {
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn new(domain: Extent, base: f64, factor: f64, fallback: f64) -> Self {
        Self {
            max: domain.max,
            degenerate: domain.is_degenerate() || domain.max == 0.0,
            base,
            factor,
            fallback,
        }
    }
}

impl Scale for RadiusScale {
    type Output = f64;

    fn scale(&self, value: f64) -> f64 {
        if self.degenerate {
            return self.fallback;
        }
        (value / self.max).ln_1p().mul_add(self.factor, self.base)
    }
}
