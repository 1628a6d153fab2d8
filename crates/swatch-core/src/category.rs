//! Category identifiers, ladder steps and tokens.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use swatch_color::ColorValue;

/// Contrast above which a background takes the base text color.
pub const CONTRAST_THRESHOLD: f32 = 50.0;

/// Identifier of a seed category, e.g. `primary`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CategoryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// LADDER
// =============================================================================

/// Position in a category's palette ladder.
///
/// Serialized as its token suffix: `l4`..`l1`, `seed`, `d1`..`d4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LadderStep {
    Lighten(u8),
    Seed,
    Darken(u8),
}

impl LadderStep {
    /// Number of lighten (and darken) steps.
    pub const DEPTH: u8 = 4;

    /// The full ladder, lightest first.
    pub const ALL: [Self; 9] = [
        Self::Lighten(4),
        Self::Lighten(3),
        Self::Lighten(2),
        Self::Lighten(1),
        Self::Seed,
        Self::Darken(1),
        Self::Darken(2),
        Self::Darken(3),
        Self::Darken(4),
    ];

    /// Signed number of steps away from the seed; lighter is positive.
    pub fn offset(self) -> i8 {
        match self {
            Self::Lighten(n) => n as i8,
            Self::Seed => 0,
            Self::Darken(n) => -(n as i8),
        }
    }

    pub fn suffix(self) -> String {
        match self {
            Self::Lighten(n) => format!("l{n}"),
            Self::Seed => "seed".to_string(),
            Self::Darken(n) => format!("d{n}"),
        }
    }
}

impl fmt::Display for LadderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix())
    }
}

impl FromStr for LadderStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid ladder step '{s}'");
        if s == "seed" {
            return Ok(Self::Seed);
        }
        let (kind, n) = s.split_at_checked(1).ok_or_else(invalid)?;
        let n: u8 = n.parse().map_err(|_| invalid())?;
        if !(1..=Self::DEPTH).contains(&n) {
            return Err(invalid());
        }
        match kind {
            "l" => Ok(Self::Lighten(n)),
            "d" => Ok(Self::Darken(n)),
            _ => Err(invalid()),
        }
    }
}

impl From<LadderStep> for String {
    fn from(step: LadderStep) -> Self {
        step.suffix()
    }
}

impl TryFrom<String> for LadderStep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// TOKENS
// =============================================================================

/// Symbolic reference to one ladder position of a category.
///
/// Resolves to a color only against an environment, through the custom
/// property `--{category}-{step}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorToken {
    pub category: CategoryId,
    pub step: LadderStep,
}

impl ColorToken {
    pub fn new(category: CategoryId, step: LadderStep) -> Self {
        Self { category, step }
    }

    /// Custom property carrying this token, e.g. `--accent-l2`.
    pub fn property(&self) -> String {
        format!("--{}-{}", self.category, self.step)
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var({})", self.property())
    }
}

// =============================================================================
// TEXT COLORS
// =============================================================================

/// Which of the two text colors reads best on a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextColor {
    #[serde(rename = "var(--text-base)")]
    Base,
    #[serde(rename = "var(--text-contrast)")]
    Contrast,
}

impl TextColor {
    /// Base text when `background` differs from `base` by more than
    /// [`CONTRAST_THRESHOLD`] L*, contrast text otherwise.
    pub fn for_background(background: &ColorValue, base: &ColorValue) -> Self {
        if background.contrast_lstar(base) > CONTRAST_THRESHOLD {
            Self::Base
        } else {
            Self::Contrast
        }
    }

    pub fn css_var(self) -> &'static str {
        match self {
            Self::Base => "var(--text-base)",
            Self::Contrast => "var(--text-contrast)",
        }
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_var())
    }
}

/// The parsed base and contrast text colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextColors {
    pub base: ColorValue,
    pub contrast: ColorValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_order_and_offsets() {
        assert_eq!(
            LadderStep::ALL.map(LadderStep::offset),
            [4, 3, 2, 1, 0, -1, -2, -3, -4]
        );
    }

    #[test]
    fn test_step_parse() {
        for step in LadderStep::ALL {
            assert_eq!(step.suffix().parse::<LadderStep>().unwrap(), step);
        }
        assert!("l5".parse::<LadderStep>().is_err());
        assert!("x1".parse::<LadderStep>().is_err());
        assert!("".parse::<LadderStep>().is_err());
    }

    #[test]
    fn test_token_property() {
        let token = ColorToken::new("accent".into(), LadderStep::Lighten(2));
        assert_eq!(token.property(), "--accent-l2");
        assert_eq!(token.to_string(), "var(--accent-l2)");
    }

    #[test]
    fn test_text_color_threshold() {
        let base = ColorValue::from_rgb8(0x1a, 0x1a, 0x1a);
        let white = ColorValue::srgb(1.0, 1.0, 1.0);
        assert_eq!(TextColor::for_background(&white, &base), TextColor::Base);
        assert_eq!(TextColor::for_background(&base, &base), TextColor::Contrast);
    }

    #[test]
    fn test_text_color_serializes_as_css_var() {
        let json = serde_json::to_string(&TextColor::Contrast).unwrap();
        assert_eq!(json, "\"var(--text-contrast)\"");
    }
}
