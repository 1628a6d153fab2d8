//! Relative color resolution.
//!
//! A reference (`var(--color-primary)`, a literal color or a relative color
//! expression) is rewritten into the relative syntax of a target space family
//! and evaluated against the environment.

use swatch_color::{ColorSpace, ColorValue};
use swatch_env::{Environment, StyleHost};
use tracing::warn;

use crate::error::Result;

/// A target space family and its relative-syntax form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceFamily {
    /// Names that select this family.
    pub names: &'static [&'static str],
    /// CSS functions that already produce a color in this family.
    pub functions: &'static [&'static str],
    /// Function used for the `from` wrapper.
    pub function: &'static str,
    /// Channel keywords passed through unchanged.
    pub channels: [&'static str; 3],
    /// Space the resolved color is converted into.
    pub space: ColorSpace,
}

/// Supported target families.
pub const SPACE_FAMILIES: [SpaceFamily; 4] = [
    SpaceFamily {
        names: &["oklch", "lch"],
        functions: &["oklch", "lch"],
        function: "oklch",
        channels: ["l", "c", "h"],
        space: ColorSpace::Oklch,
    },
    SpaceFamily {
        names: &["oklab", "lab"],
        functions: &["oklab", "lab"],
        function: "oklab",
        channels: ["l", "a", "b"],
        space: ColorSpace::Oklab,
    },
    SpaceFamily {
        names: &["hex", "rgb", "srgb"],
        functions: &["rgb", "rgba"],
        function: "rgb",
        channels: ["r", "g", "b"],
        space: ColorSpace::Srgb,
    },
    SpaceFamily {
        names: &["hsl"],
        functions: &["hsl", "hsla"],
        function: "hsl",
        channels: ["h", "s", "l"],
        space: ColorSpace::Hsl,
    },
];

impl SpaceFamily {
    /// Look up a family by name, case-insensitively.
    pub fn lookup(name: &str) -> Option<&'static SpaceFamily> {
        let name = name.trim().to_ascii_lowercase();
        SPACE_FAMILIES
            .iter()
            .find(|family| family.names.contains(&name.as_str()))
    }

    /// Whether `reference` is already one of this family's functions.
    pub fn contains(&self, reference: &str) -> bool {
        let reference = reference.trim_start().to_ascii_lowercase();
        self.functions.iter().any(|function| {
            reference
                .strip_prefix(function)
                .is_some_and(|rest| rest.starts_with('('))
        })
    }

    /// `reference` in this family's relative syntax.
    pub fn relative(&self, reference: &str) -> String {
        if self.contains(reference) {
            return reference.trim().to_string();
        }
        let [a, b, c] = self.channels;
        format!("{}(from {} {a} {b} {c})", self.function, reference.trim())
    }
}

/// Rewrite `reference` into the relative syntax of the family `space`.
///
/// An unknown family is logged and `reference` is returned unchanged.
pub fn relative_expression(reference: &str, space: &str) -> String {
    match SpaceFamily::lookup(space) {
        Some(family) => family.relative(reference),
        None => {
            warn!(space, reference, "unknown color space, passing reference through");
            reference.to_string()
        }
    }
}

/// Resolve `reference` to a color in the family `space`.
///
/// For an unknown family the reference is evaluated as written and keeps
/// whatever space it parses to.
///
/// # Errors
///
/// Returns an error if the expression does not evaluate to a color.
pub fn resolve<H: StyleHost>(
    env: &Environment<H>,
    reference: &str,
    space: &str,
) -> Result<ColorValue> {
    let expression = relative_expression(reference, space);
    let color = env.evaluate_color(&expression)?;
    Ok(match SpaceFamily::lookup(space) {
        Some(family) => color.convert(family.space),
        None => color,
    })
}

/// Resolve `reference` to a `#rrggbb` string.
///
/// # Errors
///
/// Returns an error if the expression does not evaluate to a color.
pub fn resolve_hex<H: StyleHost>(env: &Environment<H>, reference: &str) -> Result<String> {
    Ok(resolve(env, reference, "hex")?.to_hex())
}
