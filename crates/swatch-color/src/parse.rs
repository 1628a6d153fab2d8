//! CSS color parsing on top of `cssparser`.
//!
//! Supported syntax:
//! - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - named colors (`rebeccapurple`, `transparent`, ...)
//! - `rgb()`/`rgba()` and `hsl()`/`hsla()` in comma or space syntax
//! - `oklch()`, `oklab()`, and the CIE `lch()` and `lab()` functions
//! - an optional `/ alpha` in space syntax
//! - relative colors: `oklch(from <color> l c calc(h + 120))`
//! - `calc()` with `+ - * /`, parentheses and channel keywords
//!
//! `var()` is not understood here; use [`parse_with`] to substitute
//! custom properties first.

use cssparser::color::{parse_hash_color, parse_named_color};
use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::css::{describe_token, error_reason};
use crate::error::{ColorError, Result};
use crate::space::ColorSpace;
use crate::value::ColorValue;
use crate::vars::{PropertyLookup, substitute_vars};

type ParseResult<'i, T> = std::result::Result<T, ParseError<'i, String>>;

/// Reference value for `100%` chroma and a/b in OKLCH/OKLAB.
const OK_PERCENT_REFERENCE: f32 = 0.4;
/// Reference value for `100%` a/b in CIE Lab.
const LAB_PERCENT_REFERENCE: f32 = 125.0;
/// Reference value for `100%` chroma in CIE LCH.
const LCH_CHROMA_PERCENT_REFERENCE: f32 = 150.0;

/// Parse a color string.
///
/// # Errors
///
/// Returns [`ColorError::Parse`] when the input is not a recognized color
/// notation, including any unresolved `var()` reference.
pub fn parse(input: &str) -> Result<ColorValue> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorError::parse(input, "empty color string"));
    }
    let mut parser_input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut parser_input);
    parser
        .parse_entirely(parse_color)
        .map_err(|error| ColorError::parse(input, error_reason(error)))
}

/// Parse a color string after substituting `var()` references from `lookup`.
///
/// # Errors
///
/// Returns [`ColorError::Parse`] for undefined or cyclic references and for
/// anything [`parse`] rejects. The error carries the original input.
pub fn parse_with(input: &str, lookup: &dyn PropertyLookup) -> Result<ColorValue> {
    let substituted = substitute_vars(input, lookup)?;
    tracing::trace!(input, substituted = %substituted, "substituted var() references");
    parse(&substituted).map_err(|error| match error {
        ColorError::Parse { reason, .. } => ColorError::parse(input, reason),
        other => other,
    })
}

// =============================================================================
// NOTATIONS
// =============================================================================

/// A color function and its channel conventions.
///
/// Channel numbers use CSS scales: sRGB `0..=255`, HSL saturation/lightness
/// `0..=100`, OK lightness `0..=1`, CIE lightness `0..=100`, hues in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Rgb,
    Hsl,
    Oklch,
    Oklab,
    Lch,
    Lab,
}

impl Notation {
    fn from_function(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => Some(Self::Rgb),
            "hsl" | "hsla" => Some(Self::Hsl),
            "oklch" => Some(Self::Oklch),
            "oklab" => Some(Self::Oklab),
            "lch" => Some(Self::Lch),
            "lab" => Some(Self::Lab),
            _ => None,
        }
    }

    fn keywords(self) -> [&'static str; 3] {
        match self {
            Self::Rgb => ["r", "g", "b"],
            Self::Hsl => ["h", "s", "l"],
            Self::Oklch | Self::Lch => ["l", "c", "h"],
            Self::Oklab | Self::Lab => ["l", "a", "b"],
        }
    }

    fn is_hue_channel(self, index: usize) -> bool {
        matches!(
            (self, index),
            (Self::Hsl, 0) | (Self::Oklch, 2) | (Self::Lch, 2)
        )
    }

    fn allows_commas(self) -> bool {
        matches!(self, Self::Rgb | Self::Hsl)
    }

    /// Channels of `color` on this notation's scales.
    fn channels_of(self, color: &ColorValue) -> [f32; 3] {
        match self {
            Self::Rgb => color
                .convert(ColorSpace::Srgb)
                .channels()
                .map(|v| v * 255.0),
            Self::Hsl => {
                let [h, s, l] = color.convert(ColorSpace::Hsl).channels();
                [h, s * 100.0, l * 100.0]
            }
            Self::Oklch => color.convert(ColorSpace::Oklch).channels(),
            Self::Oklab => color.convert(ColorSpace::Oklab).channels(),
            Self::Lch => color.cie_lch(),
            Self::Lab => color.cie_lab(),
        }
    }

    /// Resolve a percentage (`p` in `0..=100`) for the channel at `index`.
    fn percent(self, index: usize, p: f32) -> f32 {
        if index == 3 {
            return p / 100.0;
        }
        match (self, index) {
            (Self::Rgb, _) => p / 100.0 * 255.0,
            (Self::Hsl, _) | (Self::Lch | Self::Lab, 0) | (Self::Oklch | Self::Lch, 2) => p,
            (Self::Oklch | Self::Oklab, 0) => p / 100.0,
            (Self::Oklch | Self::Oklab, _) => p / 100.0 * OK_PERCENT_REFERENCE,
            (Self::Lch, _) => p / 100.0 * LCH_CHROMA_PERCENT_REFERENCE,
            (Self::Lab, _) => p / 100.0 * LAB_PERCENT_REFERENCE,
        }
    }

    fn build(self, [a, b, c]: [f32; 3], alpha: f32) -> ColorValue {
        match self {
            Self::Rgb => {
                ColorValue::new(ColorSpace::Srgb, [a / 255.0, b / 255.0, c / 255.0], alpha)
            }
            Self::Hsl => ColorValue::new(ColorSpace::Hsl, [a, b / 100.0, c / 100.0], alpha),
            Self::Oklch => ColorValue::new(ColorSpace::Oklch, [a, b, c], alpha),
            Self::Oklab => ColorValue::new(ColorSpace::Oklab, [a, b, c], alpha),
            Self::Lch => ColorValue::from_cie_lch(a, b, c).with_alpha(alpha),
            Self::Lab => ColorValue::from_cie_lab(a, b, c).with_alpha(alpha),
        }
    }
}

/// A notation plus the origin color when the function uses relative syntax.
struct ChannelScope {
    notation: Notation,
    origin: Option<([f32; 3], f32)>,
}

impl ChannelScope {
    fn new(notation: Notation, origin: Option<ColorValue>) -> Self {
        let origin = origin.map(|color| (notation.channels_of(&color), color.alpha()));
        Self { notation, origin }
    }

    /// Value of a channel keyword taken from the origin color.
    fn keyword(&self, name: &str) -> Option<f32> {
        let (channels, alpha) = self.origin?;
        if name == "alpha" {
            return Some(alpha);
        }
        self.notation
            .keywords()
            .iter()
            .position(|k| *k == name)
            .map(|index| channels[index])
    }

    fn resolve_keyword(&self, word: &str) -> std::result::Result<f32, String> {
        let word = word.to_ascii_lowercase();
        if word == "none" {
            return Ok(0.0);
        }
        self.keyword(&word).ok_or_else(|| {
            if self.origin.is_none() {
                format!("channel keyword '{word}' requires relative syntax")
            } else {
                format!("unknown channel keyword '{word}'")
            }
        })
    }

    fn build(&self, channels: [f32; 3], alpha: Option<f32>) -> ColorValue {
        let alpha = alpha
            .or_else(|| self.origin.map(|(_, alpha)| alpha))
            .unwrap_or(1.0);
        self.notation.build(channels, alpha)
    }
}

fn angle_to_degrees(value: f32, unit: &str) -> Option<f32> {
    match unit.to_ascii_lowercase().as_str() {
        "deg" => Some(value),
        "rad" => Some(value.to_degrees()),
        "grad" => Some(value * 0.9),
        "turn" => Some(value * 360.0),
        _ => None,
    }
}

// =============================================================================
// PARSER
// =============================================================================

fn parse_color<'i>(input: &mut Parser<'i, '_>) -> ParseResult<'i, ColorValue> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    match token {
        Token::Hash(ref value) | Token::IDHash(ref value) => parse_hash_color(value.as_bytes())
            .map(|(r, g, b, alpha)| ColorValue::from_rgb8(r, g, b).with_alpha(alpha))
            .map_err(|()| location.new_custom_error(format!("invalid hex color '#{value}'"))),
        Token::Ident(ref name) if name.eq_ignore_ascii_case("transparent") => {
            Ok(ColorValue::srgb(0.0, 0.0, 0.0).with_alpha(0.0))
        }
        Token::Ident(ref name) => parse_named_color(name)
            .map(|(r, g, b)| ColorValue::from_rgb8(r, g, b))
            .map_err(|()| location.new_custom_error(format!("unknown color name '{name}'"))),
        Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
            Err(location.new_custom_error("unresolved var() reference"))
        }
        Token::Function(ref name) => {
            let notation = Notation::from_function(name).ok_or_else(|| {
                location.new_custom_error(format!("unknown color function '{name}()'"))
            })?;
            input.parse_nested_block(|block| parse_function(block, notation))
        }
        ref other => Err(location.new_custom_error(format!(
            "expected a color, found {}",
            describe_token(other)
        ))),
    }
}

fn parse_function<'i>(
    input: &mut Parser<'i, '_>,
    notation: Notation,
) -> ParseResult<'i, ColorValue> {
    let origin = if input
        .try_parse(|input| input.expect_ident_matching("from"))
        .is_ok()
    {
        Some(parse_color(input)?)
    } else {
        None
    };
    let scope = ChannelScope::new(notation, origin);

    let first = parse_channel(input, &scope, 0)?;
    let legacy = scope.origin.is_none()
        && notation.allows_commas()
        && input.try_parse(|input| input.expect_comma()).is_ok();
    let second = parse_channel(input, &scope, 1)?;
    if legacy {
        input.expect_comma()?;
    }
    let third = parse_channel(input, &scope, 2)?;

    let has_alpha = if legacy {
        input.try_parse(|input| input.expect_comma()).is_ok()
    } else {
        input.try_parse(|input| input.expect_delim('/')).is_ok()
    };
    let alpha = if has_alpha {
        Some(parse_channel(input, &scope, 3)?)
    } else {
        None
    };
    Ok(scope.build([first, second, third], alpha))
}

fn parse_channel<'i>(
    input: &mut Parser<'i, '_>,
    scope: &ChannelScope,
    index: usize,
) -> ParseResult<'i, f32> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(value),
        Token::Percentage { unit_value, .. } => {
            Ok(scope.notation.percent(index, unit_value * 100.0))
        }
        Token::Dimension {
            value, ref unit, ..
        } if scope.notation.is_hue_channel(index) => angle_to_degrees(value, unit)
            .ok_or_else(|| location.new_custom_error(format!("invalid angle unit '{unit}'"))),
        Token::Ident(ref word) => scope
            .resolve_keyword(word)
            .map_err(|reason| location.new_custom_error(reason)),
        Token::Function(ref name) if name.eq_ignore_ascii_case("calc") => {
            input.parse_nested_block(|block| parse_sum(block, scope, index))
        }
        Token::Function(ref name) if name.eq_ignore_ascii_case("var") => {
            Err(location.new_custom_error("unresolved var() reference"))
        }
        ref other => Err(location.new_custom_error(format!(
            "unexpected {} in channel position",
            describe_token(other)
        ))),
    }
}

/// Consume one of `operators` as a delimiter token.
fn expect_operator<'i>(input: &mut Parser<'i, '_>, operators: &[char]) -> ParseResult<'i, char> {
    let location = input.current_source_location();
    match input.next()? {
        Token::Delim(op) if operators.contains(op) => Ok(*op),
        other => Err(location.new_unexpected_token_error(other.clone())),
    }
}

fn parse_sum<'i>(
    input: &mut Parser<'i, '_>,
    scope: &ChannelScope,
    index: usize,
) -> ParseResult<'i, f32> {
    let mut acc = parse_product(input, scope, index)?;
    while let Ok(op) = input.try_parse(|input| expect_operator(input, &['+', '-'])) {
        let rhs = parse_product(input, scope, index)?;
        if op == '+' {
            acc += rhs;
        } else {
            acc -= rhs;
        }
    }
    Ok(acc)
}

fn parse_product<'i>(
    input: &mut Parser<'i, '_>,
    scope: &ChannelScope,
    index: usize,
) -> ParseResult<'i, f32> {
    let mut acc = parse_factor(input, scope, index)?;
    while let Ok(op) = input.try_parse(|input| expect_operator(input, &['*', '/'])) {
        let location = input.current_source_location();
        let rhs = parse_factor(input, scope, index)?;
        if op == '*' {
            acc *= rhs;
        } else if rhs == 0.0 {
            return Err(location.new_custom_error("division by zero in calc()"));
        } else {
            acc /= rhs;
        }
    }
    Ok(acc)
}

fn parse_factor<'i>(
    input: &mut Parser<'i, '_>,
    scope: &ChannelScope,
    index: usize,
) -> ParseResult<'i, f32> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(value),
        Token::Percentage { unit_value, .. } => {
            Ok(scope.notation.percent(index, unit_value * 100.0))
        }
        Token::Dimension {
            value, ref unit, ..
        } => angle_to_degrees(value, unit)
            .ok_or_else(|| location.new_custom_error(format!("invalid unit '{unit}' in calc()"))),
        Token::Ident(ref word) if word.eq_ignore_ascii_case("pi") => Ok(std::f32::consts::PI),
        Token::Ident(ref word) if word.eq_ignore_ascii_case("e") => Ok(std::f32::consts::E),
        Token::Ident(ref word) => scope
            .resolve_keyword(word)
            .map_err(|reason| location.new_custom_error(reason)),
        Token::ParenthesisBlock => {
            input.parse_nested_block(|block| parse_sum(block, scope, index))
        }
        Token::Function(ref name) if name.eq_ignore_ascii_case("calc") => {
            input.parse_nested_block(|block| parse_sum(block, scope, index))
        }
        ref other => Err(location.new_custom_error(format!(
            "unexpected {} in calc()",
            describe_token(other)
        ))),
    }
}
