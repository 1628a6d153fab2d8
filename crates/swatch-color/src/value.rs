//! The [`ColorValue`] type and its conversions.

use std::fmt;
use std::str::FromStr;

use palette::convert::FromColorUnclamped;
use palette::{FromColor, Hsl, Lab, Lch, Oklab, Oklch, Srgb, Xyz};
use serde::{Deserialize, Serialize};

use crate::error::ColorError;
use crate::format::format_number;
use crate::space::ColorSpace;

/// Channel tolerance used by `PartialEq`.
pub const CHANNEL_EPSILON: f32 = 1e-3;

/// Chroma (or saturation) below which the hue channel carries no information.
const ACHROMATIC_THRESHOLD: f32 = 1e-4;

/// A color tagged with the space its channels are expressed in.
///
/// Values are normalized on construction: hues wrap into `0..360`, alpha is
/// clamped to `0..=1`, OKLCH/OKLAB lightness is clamped to `0..=1`, chroma is
/// never negative and sRGB/HSL channels stay inside `0..=1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorValue {
    space: ColorSpace,
    channels: [f32; 3],
    alpha: f32,
}

impl ColorValue {
    /// Create a color in `space`.
    pub fn new(space: ColorSpace, channels: [f32; 3], alpha: f32) -> Self {
        let [a, b, c] = channels.map(|v| if v.is_finite() { v } else { 0.0 });
        let channels = match space {
            ColorSpace::Srgb => [a.clamp(0.0, 1.0), b.clamp(0.0, 1.0), c.clamp(0.0, 1.0)],
            ColorSpace::Oklch => [a.clamp(0.0, 1.0), b.max(0.0), c.rem_euclid(360.0)],
            ColorSpace::Oklab => [a.clamp(0.0, 1.0), b, c],
            ColorSpace::Hsl => [a.rem_euclid(360.0), b.clamp(0.0, 1.0), c.clamp(0.0, 1.0)],
        };
        let alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 1.0 };
        Self {
            space,
            channels,
            alpha,
        }
    }

    /// Opaque sRGB color from `0..=1` channels.
    pub fn srgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(ColorSpace::Srgb, [r, g, b], 1.0)
    }

    /// Opaque sRGB color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::srgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Opaque OKLCH color.
    pub fn oklch(l: f32, c: f32, h: f32) -> Self {
        Self::new(ColorSpace::Oklch, [l, c, h], 1.0)
    }

    /// Opaque OKLAB color.
    pub fn oklab(l: f32, a: f32, b: f32) -> Self {
        Self::new(ColorSpace::Oklab, [l, a, b], 1.0)
    }

    /// Opaque HSL color (saturation and lightness in `0..=1`).
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::new(ColorSpace::Hsl, [h, s, l], 1.0)
    }

    /// Opaque color from CIE Lab (D65 white, `l` in `0..=100`), stored as
    /// OKLAB.
    pub fn from_cie_lab(l: f32, a: f32, b: f32) -> Self {
        let xyz: Xyz = Xyz::from_color_unclamped(Lab::new(l.clamp(0.0, 100.0), a, b));
        let lab: Oklab = Oklab::from_color_unclamped(xyz);
        Self::oklab(lab.l, lab.a, lab.b)
    }

    /// Opaque color from CIE LCH (D65 white, `l` in `0..=100`), stored as
    /// OKLCH.
    pub fn from_cie_lch(l: f32, c: f32, h: f32) -> Self {
        let lab: Lab = Lab::from_color_unclamped(Lch::new(l.clamp(0.0, 100.0), c.max(0.0), h));
        let oklab: Oklab = Oklab::from_color_unclamped(Xyz::from_color_unclamped(lab));
        let lch: Oklch = Oklch::from_color_unclamped(oklab);
        Self::oklch(lch.l, lch.chroma, lch.hue.into_positive_degrees())
    }

    /// CIE Lab channels (D65 white).
    pub fn cie_lab(&self) -> [f32; 3] {
        let lab: Lab = Lab::from_color_unclamped(Xyz::from_color_unclamped(self.to_oklab()));
        [lab.l, lab.a, lab.b]
    }

    /// CIE LCH channels (D65 white), hue in degrees.
    pub fn cie_lch(&self) -> [f32; 3] {
        let lab: Lab = Lab::from_color_unclamped(Xyz::from_color_unclamped(self.to_oklab()));
        let lch: Lch = Lch::from_color_unclamped(lab);
        [lch.l, lch.chroma, lch.hue.into_positive_degrees()]
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.space, self.channels, alpha)
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn channels(&self) -> [f32; 3] {
        self.channels
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    fn to_oklab(self) -> Oklab {
        let [a, b, c] = self.channels;
        match self.space {
            ColorSpace::Oklab => Oklab::new(a, b, c),
            ColorSpace::Oklch => Oklab::from_color_unclamped(Oklch::new(a, b, c)),
            ColorSpace::Srgb => Oklab::from_color_unclamped(Srgb::new(a, b, c)),
            ColorSpace::Hsl => Oklab::from_color_unclamped(hsl_to_srgb(a, b, c)),
        }
    }

    fn to_srgb(self) -> Srgb {
        let [a, b, c] = self.channels;
        let rgb = match self.space {
            ColorSpace::Srgb => Srgb::new(a, b, c),
            ColorSpace::Hsl => hsl_to_srgb(a, b, c),
            _ => Srgb::from_color_unclamped(self.to_oklab()),
        };
        Srgb::new(
            rgb.red.clamp(0.0, 1.0),
            rgb.green.clamp(0.0, 1.0),
            rgb.blue.clamp(0.0, 1.0),
        )
    }

    /// Convert into `target`. Out-of-gamut colors are clamped when the target
    /// is sRGB or HSL.
    #[must_use]
    pub fn convert(&self, target: ColorSpace) -> Self {
        if target == self.space {
            return *self;
        }
        let channels = match target {
            ColorSpace::Srgb => {
                let rgb = self.to_srgb();
                [rgb.red, rgb.green, rgb.blue]
            }
            ColorSpace::Hsl => {
                let hsl: Hsl = Hsl::from_color_unclamped(self.to_srgb());
                [
                    hsl.hue.into_positive_degrees(),
                    hsl.saturation,
                    hsl.lightness,
                ]
            }
            ColorSpace::Oklab => {
                let lab = self.to_oklab();
                [lab.l, lab.a, lab.b]
            }
            ColorSpace::Oklch => {
                let lch: Oklch = Oklch::from_color_unclamped(self.to_oklab());
                [lch.l, lch.chroma, lch.hue.into_positive_degrees()]
            }
        };
        Self::new(target, channels, self.alpha)
    }

    /// 8-bit sRGB channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let rgb = self.to_srgb();
        [rgb.red, rgb.green, rgb.blue].map(|v| (v * 255.0).round() as u8)
    }

    /// `#rrggbb` in lowercase.
    ///
    /// Alpha is discarded rather than premultiplied; a translucent color
    /// serializes as its opaque counterpart.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CIE L* lightness in `0..=100`.
    pub fn lightness_lstar(&self) -> f32 {
        let lab: Lab = Lab::from_color(self.to_srgb());
        lab.l.clamp(0.0, 100.0)
    }

    /// Lightness-difference contrast: `|L*(self) - L*(other)|`, in `0..=100`.
    pub fn contrast_lstar(&self, other: &ColorValue) -> f32 {
        (self.lightness_lstar() - other.lightness_lstar())
            .abs()
            .clamp(0.0, 100.0)
    }

    /// Compare channel-wise after converting `other` into this color's space.
    pub fn approx_eq(&self, other: &ColorValue, tolerance: f32) -> bool {
        let other = other.convert(self.space);
        if (self.alpha - other.alpha).abs() > tolerance {
            return false;
        }
        let achromatic = match self.space {
            ColorSpace::Oklch => {
                self.channels[1] < ACHROMATIC_THRESHOLD && other.channels[1] < ACHROMATIC_THRESHOLD
            }
            ColorSpace::Hsl => {
                self.channels[1] < ACHROMATIC_THRESHOLD && other.channels[1] < ACHROMATIC_THRESHOLD
            }
            _ => false,
        };
        (0..3).all(|i| {
            let (a, b) = (self.channels[i], other.channels[i]);
            if self.space.is_hue_channel(i) {
                if achromatic {
                    return true;
                }
                let diff = (a - b).rem_euclid(360.0);
                diff.min(360.0 - diff) <= tolerance
            } else {
                (a - b).abs() <= tolerance
            }
        })
    }

    /// Serialize as CSS, rounding channels to `precision` decimals.
    ///
    /// sRGB channels are written on the `0..=255` scale, HSL saturation and
    /// lightness as percentages. Alpha is appended only when translucent.
    pub fn to_css_string(&self, precision: usize) -> String {
        let [a, b, c] = self.channels;
        let n = |v: f32| format_number(v, precision);
        let body = match self.space {
            ColorSpace::Srgb => format!("{} {} {}", n(a * 255.0), n(b * 255.0), n(c * 255.0)),
            ColorSpace::Hsl => format!("{} {}% {}%", n(a), n(b * 100.0), n(c * 100.0)),
            ColorSpace::Oklch | ColorSpace::Oklab => format!("{} {} {}", n(a), n(b), n(c)),
        };
        if self.alpha < 1.0 {
            format!(
                "{}({body} / {})",
                self.space.css_function(),
                n(self.alpha)
            )
        } else {
            format!("{}({body})", self.space.css_function())
        }
    }
}

fn hsl_to_srgb(h: f32, s: f32, l: f32) -> Srgb {
    let hsl: Hsl = Hsl::new(h, s, l);
    Srgb::from_color_unclamped(hsl)
}

impl PartialEq for ColorValue {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, CHANNEL_EPSILON)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string(4))
    }
}

impl FromStr for ColorValue {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(s)
    }
}

/// Convert `value` into `target`.
pub fn convert(value: &ColorValue, target: ColorSpace) -> ColorValue {
    value.convert(target)
}

/// `#rrggbb` for `value`, alpha discarded.
pub fn to_hex(value: &ColorValue) -> String {
    value.to_hex()
}

/// Perceptual lightness contrast between two colors, in `0..=100`.
pub fn contrast_lstar(a: &ColorValue, b: &ColorValue) -> f32 {
    a.contrast_lstar(b)
}
