//! RGB colors and the low-to-high color scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scale::{Extent, Scale};

/// Errors from parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The string is not `#` followed by six characters.
    #[error("color must look like #RRGGBB, got {0:?}")]
    Format(String),

    /// One of the channels is not a hexadecimal byte.
    #[error("invalid hex digits in color {0:?}")]
    Hex(String),
}

/// A 24-bit RGB color.
///
/// Parses from and displays as `#rrggbb`. Parsing accepts either case;
/// display is always lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel interpolation: `round(self * (1 - ratio) + other * ratio)`.
    ///
    /// A ratio of exactly `0.0` returns `self` and `1.0` returns `other`.
    #[must_use]
    pub fn blend(self, other: Self, ratio: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mix = |low: u8, high: u8| -> u8 {
            f64::from(low)
                .mul_add(1.0 - ratio, f64::from(high) * ratio)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| ColorError::Format(s.to_owned()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorError::Hex(s.to_owned()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Named colors used by the default chart configurations.
pub mod palette {
    use super::Rgb;

    /// `#3B82F6`
    pub const BLUE: Rgb = Rgb::new(0x3B, 0x82, 0xF6);
    /// `#10B981`
    pub const GREEN: Rgb = Rgb::new(0x10, 0xB9, 0x81);
    /// `#F59E0B`
    pub const AMBER: Rgb = Rgb::new(0xF5, 0x9E, 0x0B);
    /// `#EC4899`
    pub const PINK: Rgb = Rgb::new(0xEC, 0x48, 0x99);
}

/// Maps a value domain onto a gradient between two colors.
///
/// A degenerate domain (all values equal) maps every value to `high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: Extent,
    low: Rgb,
    high: Rgb,
}

impl ColorScale {
    #[must_use]
    pub const fn new(domain: Extent, low: Rgb, high: Rgb) -> Self {
        Self { domain, low, high }
    }
}

impl Scale for ColorScale {
    type Output = Rgb;

    fn scale(&self, value: f64) -> Rgb {
        if self.domain.is_degenerate() {
            return self.high;
        }
        self.low.blend(self.high, self.domain.ratio(value))
    }
}
