//! Palette derivation.
//!
//! Every ladder step is resolved against the seed property directly, never
//! against a neighboring step, so rounding does not compound and each
//! variant depends on exactly one seed.

use swatch_color::{ColorSpace, ColorValue, format_number};
use swatch_env::{Environment, StyleHost};
use tracing::{trace, warn};

use crate::category::{CategoryId, ColorToken, LadderStep, TextColors};
use crate::resolver;
use crate::store::VariantState;

/// Default OKLCH lightness change per ladder step.
pub const DEFAULT_STEP: f32 = 0.1;

/// Seed reference a palette is derived from.
#[derive(Debug, Clone, Copy)]
pub struct Seed<'a> {
    pub category: &'a CategoryId,
    /// Custom property holding the seed, e.g. `--color-primary`.
    pub property: &'a str,
    /// Last known seed color, used when a step cannot be resolved.
    pub color: &'a ColorValue,
}

/// Derives the nine-step ladder for a seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteDeriver {
    step: f32,
}

impl Default for PaletteDeriver {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl PaletteDeriver {
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Relative expression for `step` when the environment declares no token.
    pub fn default_expression(&self, seed_property: &str, step: LadderStep) -> String {
        let offset = step.offset();
        let amount = format_number(f32::from(offset.unsigned_abs()) * self.step, 4);
        let lightness = match offset {
            0 => "l".to_string(),
            n if n > 0 => format!("calc(l + {amount})"),
            _ => format!("calc(l - {amount})"),
        };
        format!("oklch(from var({seed_property}) {lightness} c h)")
    }

    /// Reference resolved for `token`: its declared property when the
    /// environment has one, otherwise the default expression.
    fn reference<H: StyleHost>(
        &self,
        env: &Environment<H>,
        token: &ColorToken,
        seed_property: &str,
    ) -> String {
        let property = token.property();
        if env.get_property(&property).is_some() {
            format!("var({property})")
        } else {
            self.default_expression(seed_property, token.step)
        }
    }

    /// Resolve all nine ladder positions of `seed`.
    ///
    /// A step that fails to resolve keeps its entry from `previous`, or falls
    /// back to the seed color; the rest of the ladder is still derived.
    pub fn derive<H: StyleHost>(
        &self,
        env: &Environment<H>,
        seed: Seed<'_>,
        text: &TextColors,
        previous: &[VariantState],
    ) -> Vec<VariantState> {
        LadderStep::ALL
            .into_iter()
            .map(|step| {
                let token = ColorToken::new(seed.category.clone(), step);
                let reference = self.reference(env, &token, seed.property);
                match resolver::resolve(env, &reference, "oklch") {
                    Ok(resolved) => {
                        trace!(token = %token, %resolved, "resolved variant");
                        VariantState::new(token, resolved, text)
                    }
                    Err(error) => {
                        warn!(token = %token, %error, "variant did not resolve, keeping last value");
                        previous
                            .iter()
                            .find(|variant| variant.token == token)
                            .cloned()
                            .unwrap_or_else(|| {
                                let fallback = seed.color.convert(ColorSpace::Oklch);
                                VariantState::new(token, fallback, text)
                            })
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::TextColor;
    use swatch_env::MemoryStyleHost;

    fn text() -> TextColors {
        TextColors {
            base: ColorValue::from_rgb8(0x1a, 0x1a, 0x1a),
            contrast: ColorValue::from_rgb8(0xfa, 0xfa, 0xfa),
        }
    }

    fn env(css: &str) -> Environment<MemoryStyleHost> {
        Environment::new(MemoryStyleHost::from_stylesheet(css).unwrap()).unwrap()
    }

    #[test]
    fn test_default_expression() {
        let deriver = PaletteDeriver::default();
        assert_eq!(
            deriver.default_expression("--color-primary", LadderStep::Lighten(2)),
            "oklch(from var(--color-primary) calc(l + 0.2) c h)"
        );
        assert_eq!(
            deriver.default_expression("--color-primary", LadderStep::Seed),
            "oklch(from var(--color-primary) l c h)"
        );
        assert_eq!(
            deriver.default_expression("--color-primary", LadderStep::Darken(3)),
            "oklch(from var(--color-primary) calc(l - 0.3) c h)"
        );
    }

    #[test]
    fn test_ladder_is_complete_and_ordered() {
        let env = env("--color-primary: #3366cc;");
        let category = CategoryId::from("primary");
        let seed_color = ColorValue::from_rgb8(0x33, 0x66, 0xcc);
        let variants = PaletteDeriver::default().derive(
            &env,
            Seed {
                category: &category,
                property: "--color-primary",
                color: &seed_color,
            },
            &text(),
            &[],
        );
        assert_eq!(variants.len(), 9);
        let lightness: Vec<f32> = variants.iter().map(|v| v.resolved.channels()[0]).collect();
        assert!(lightness.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(variants[4].hex_value, "#3366cc");
        assert!(variants.iter().all(|v| v.resolved.space() == ColorSpace::Oklch));
        for variant in &variants {
            let expected = TextColor::for_background(&variant.resolved, &text().base);
            assert_eq!(variant.contrasting_text_color, expected);
        }
    }

    #[test]
    fn test_declared_token_overrides_default() {
        let env = env("--color-primary: #3366cc; --primary-l1: #ffffff;");
        let category = CategoryId::from("primary");
        let seed_color = ColorValue::from_rgb8(0x33, 0x66, 0xcc);
        let variants = PaletteDeriver::default().derive(
            &env,
            Seed {
                category: &category,
                property: "--color-primary",
                color: &seed_color,
            },
            &text(),
            &[],
        );
        assert_eq!(variants[3].token.step, LadderStep::Lighten(1));
        assert_eq!(variants[3].hex_value, "#ffffff");
    }

    #[test]
    fn test_unresolvable_step_falls_back() {
        let env = env("--color-primary: #3366cc; --primary-d2: nonsense;");
        let category = CategoryId::from("primary");
        let seed_color = ColorValue::from_rgb8(0x33, 0x66, 0xcc);
        let seed = Seed {
            category: &category,
            property: "--color-primary",
            color: &seed_color,
        };
        let deriver = PaletteDeriver::default();

        let fresh = deriver.derive(&env, seed, &text(), &[]);
        assert_eq!(fresh.len(), 9);
        assert_eq!(fresh[6].hex_value, "#3366cc");

        let mut previous = fresh.clone();
        previous[6].hex_value = "#010203".to_string();
        let again = deriver.derive(&env, seed, &text(), &previous);
        assert_eq!(again[6].hex_value, "#010203");
    }
}
