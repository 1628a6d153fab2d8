//! Supported color spaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// A color space a [`ColorValue`](crate::ColorValue) can be expressed in.
///
/// Channel conventions:
/// - `Srgb`: red, green, blue in `0..=1`
/// - `Oklch`: lightness `0..=1`, chroma `>= 0`, hue in degrees
/// - `Oklab`: lightness `0..=1`, a, b
/// - `Hsl`: hue in degrees, saturation and lightness in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Srgb,
    Oklch,
    Oklab,
    Hsl,
}

impl ColorSpace {
    /// All supported spaces.
    pub const ALL: [Self; 4] = [Self::Srgb, Self::Oklch, Self::Oklab, Self::Hsl];

    /// Canonical lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::Oklch => "oklch",
            Self::Oklab => "oklab",
            Self::Hsl => "hsl",
        }
    }

    /// CSS function name used when serializing a value in this space.
    pub fn css_function(&self) -> &'static str {
        match self {
            Self::Srgb => "rgb",
            Self::Oklch => "oklch",
            Self::Oklab => "oklab",
            Self::Hsl => "hsl",
        }
    }

    /// Whether the channel at `index` is a hue angle.
    pub(crate) fn is_hue_channel(&self, index: usize) -> bool {
        matches!((self, index), (Self::Oklch, 2) | (Self::Hsl, 0))
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColorSpace {
    type Err = ColorError;

    /// `hex` and `rgb` name sRGB. As target-space names `lch` and `lab`
    /// select the OK family; the `lch()`/`lab()` color functions themselves
    /// are parsed as CIE.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srgb" | "rgb" | "hex" => Ok(Self::Srgb),
            "oklch" | "lch" => Ok(Self::Oklch),
            "oklab" | "lab" => Ok(Self::Oklab),
            "hsl" => Ok(Self::Hsl),
            _ => Err(ColorError::UnknownColorSpace(s.to_string())),
        }
    }
}
