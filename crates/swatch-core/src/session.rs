//! A color session: environment, store, debouncer and calculating flag.

use std::time::Instant;

use indexmap::IndexMap;
use swatch_color::{ColorSpace, ColorValue, parse, referenced_properties};
use swatch_env::{Environment, StyleHost};
use tracing::{debug, info_span, warn};

use crate::calculating::CalculatingFlag;
use crate::category::{CategoryId, TextColors};
use crate::config::ThemeConfig;
use crate::debounce::Debouncer;
use crate::deriver::{PaletteDeriver, Seed};
use crate::error::{CoreError, Result};
use crate::resolver;
use crate::store::{Action, CategoryMap, CategoryPatch, CategoryState, ColorState};

/// The engine behind a theming UI.
///
/// Edits arrive through [`Session::input`]; each updates the edited
/// category's live value immediately and schedules a commit that runs once
/// the category has been quiet for the debounce window. A commit re-derives
/// the category's palette and then recomputes every unedited category that
/// is relative to it.
#[derive(Debug)]
pub struct Session<H> {
    env: Environment<H>,
    deriver: PaletteDeriver,
    seeds: IndexMap<CategoryId, String>,
    state: ColorState,
    initial_snapshot: String,
    debouncer: Debouncer<CategoryId, String>,
    calculating: CalculatingFlag,
}

impl<H: StyleHost> Session<H> {
    /// Read seeds and text colors from `host` and derive every palette.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the host has no style root, a
    /// seed or text color is missing or unparsable, or the relations between
    /// categories form a chain.
    pub fn initialize(config: &ThemeConfig, host: H) -> Result<Self> {
        config.validate()?;
        let env = Environment::new(host)?;
        let initial_snapshot = env.snapshot();

        let text = TextColors {
            base: read_color(&env, "text", &config.text.base)?,
            contrast: read_color(&env, "text", &config.text.contrast)?,
        };

        let seeds: IndexMap<CategoryId, String> = config
            .palette
            .categories
            .iter()
            .map(|category| (category.clone(), config.seed_property(category)))
            .collect();

        let deriver = PaletteDeriver::new(config.palette.step);
        let mut categories = CategoryMap::new();
        for (category, property) in &seeds {
            let color = read_color(&env, category.as_str(), property)?;
            let relative_to = match config.palette.relative_to.get(category) {
                Some(root) => Some(root.clone()),
                None => infer_relation(&env, category, property, &seeds),
            };
            let state = match relative_to {
                Some(root) if root != *category => {
                    CategoryState::relative(category.clone(), color, root)
                }
                _ => CategoryState::root(category.clone(), color),
            };
            let variants = deriver.derive(
                &env,
                Seed {
                    category,
                    property,
                    color: &color,
                },
                &text,
                &[],
            );
            categories.insert(category.clone(), state.with_variants(variants));
        }

        let state = ColorState::new(categories, text)?;
        debug!(
            categories = state.current().len(),
            step = deriver.step(),
            "color session initialized"
        );
        Ok(Self {
            env,
            deriver,
            seeds,
            state,
            initial_snapshot,
            debouncer: Debouncer::new(config.debounce_window()),
            calculating: CalculatingFlag::default(),
        })
    }

    pub fn state(&self) -> &ColorState {
        &self.state
    }

    pub fn env(&self) -> &Environment<H> {
        &self.env
    }

    pub fn calculating(&self) -> &CalculatingFlag {
        &self.calculating
    }

    /// Whether `category` or its root has an edit in flight.
    pub fn is_calculating(&self, category: &str) -> bool {
        self.calculating.is_calculating(category, &self.state)
    }

    /// Whether a commit is scheduled for `category`.
    pub fn is_pending(&self, category: &str) -> bool {
        self.debouncer.is_pending(&CategoryId::from(category))
    }

    /// When the next scheduled commit becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.debouncer.next_due()
    }

    /// Apply `action` to the store.
    pub fn dispatch(&mut self, action: &Action) -> &ColorState {
        self.state = self.state.reduce(action);
        &self.state
    }

    fn seed_property(&self, category: &str) -> Result<(CategoryId, String)> {
        self.seeds
            .get_key_value(category)
            .map(|(id, property)| (id.clone(), property.clone()))
            .ok_or_else(|| CoreError::UnknownCategory(CategoryId::from(category)))
    }

    /// Record an intermediate edit.
    ///
    /// The environment and the category's live value are updated at once;
    /// dependents wait for the commit scheduled at `now` plus the debounce
    /// window.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] or [`CoreError::Color`] for an
    /// unknown category or an unparsable color. Nothing changes in that case.
    pub fn input(&mut self, category: &str, color: &str, now: Instant) -> Result<()> {
        let (category, property) = self.seed_property(category)?;
        let parsed = parse(color)?;
        self.env.set_property(&property, color);
        self.dispatch(&Action::SetColor {
            category: category.clone(),
            payload: CategoryPatch::value(parsed.to_hex()),
        });
        self.calculating.set(category.clone());
        self.debouncer.schedule(category, color.trim().to_string(), now);
        Ok(())
    }

    /// Commit every edit whose quiet window has passed at `now`.
    ///
    /// Returns the committed categories in order.
    ///
    /// # Errors
    ///
    /// Every due edit is attempted. If any of them fail, the first error is
    /// returned once the others have been committed; the failed edits are
    /// dropped.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<CategoryId>> {
        let due = self.debouncer.poll(now);
        let mut committed = Vec::with_capacity(due.len());
        let mut first_error = None;
        for (category, color) in due {
            match self.commit(category.as_str(), &color) {
                Ok(()) => committed.push(category),
                Err(error) => {
                    warn!(%category, %error, "dropping edit that failed to commit");
                    if self.calculating.category() == Some(&category) {
                        self.calculating.clear();
                    }
                    first_error.get_or_insert(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(committed),
        }
    }

    /// Confirm `color` as the seed of `category` and recompute dependents.
    ///
    /// Any pending commit for the category is dropped. Dependents that were
    /// edited directly are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] or [`CoreError::Color`] for an
    /// unknown category or an unparsable color.
    pub fn commit(&mut self, category: &str, color: &str) -> Result<()> {
        let (category, property) = self.seed_property(category)?;
        let span = info_span!("commit", category = %category);
        let _enter = span.enter();

        let parsed = parse(color)?;
        self.debouncer.cancel(&category);
        self.env.set_property(&property, color);

        let text = *self.state.text_colors();
        let previous = self
            .state
            .get(category.as_str())
            .map(|state| state.variants.clone())
            .unwrap_or_default();
        let variants = self.deriver.derive(
            &self.env,
            Seed {
                category: &category,
                property: &property,
                color: &parsed,
            },
            &text,
            &previous,
        );
        self.dispatch(&Action::SetColor {
            category: category.clone(),
            payload: CategoryPatch {
                value: Some(parsed.to_hex()),
                has_changed: Some(true),
                variants: Some(variants),
            },
        });

        let payload = self.recompute_dependents(&category, &text);
        debug!(dependents = payload.len(), "recomputed dependents");
        if !payload.is_empty() {
            self.dispatch(&Action::SetAllColors { payload });
        }

        if self.calculating.category() == Some(&category) {
            self.calculating.clear();
        }
        Ok(())
    }

    fn recompute_dependents(
        &self,
        root: &CategoryId,
        text: &TextColors,
    ) -> IndexMap<CategoryId, CategoryPatch> {
        self.state
            .dependents_of(root.as_str())
            .filter(|state| !state.has_changed)
            .filter_map(|state| {
                let property = self.seeds.get(&state.category)?;
                let reference = format!("var({property})");
                let color = match resolver::resolve(&self.env, &reference, "hex") {
                    Ok(color) => color,
                    Err(error) => {
                        warn!(category = %state.category, %error, "dependent did not resolve, keeping last value");
                        state.color
                    }
                };
                let variants = self.deriver.derive(
                    &self.env,
                    Seed {
                        category: &state.category,
                        property,
                        color: &color,
                    },
                    text,
                    &state.variants,
                );
                let patch = CategoryPatch {
                    value: Some(color.to_hex()),
                    has_changed: None,
                    variants: Some(variants),
                };
                Some((state.category.clone(), patch))
            })
            .collect()
    }

    /// Drop pending edits and restore the initial state and declarations.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Env`] if the host rejects the saved declarations.
    pub fn reset(&mut self) -> Result<()> {
        self.debouncer.cancel_all();
        self.calculating.clear();
        self.dispatch(&Action::Reset);
        self.env.reset_to_initial(&self.initial_snapshot)?;
        Ok(())
    }
}

fn read_color<H: StyleHost>(
    env: &Environment<H>,
    category: &str,
    property: &str,
) -> Result<ColorValue> {
    env.compute_color_property(property, ColorSpace::Srgb)
        .map_err(|error| CoreError::MissingSeed {
            category: category.to_string(),
            property: property.to_string(),
            reason: error.to_string(),
        })
}

/// The single other seed that `property`'s declaration refers to.
fn infer_relation<H: StyleHost>(
    env: &Environment<H>,
    category: &CategoryId,
    property: &str,
    seeds: &IndexMap<CategoryId, String>,
) -> Option<CategoryId> {
    let declaration = env.get_property(property)?;
    let mut roots = referenced_properties(&declaration)
        .into_iter()
        .filter_map(|name| {
            seeds
                .iter()
                .find(|(other, seed)| *other != category && **seed == name)
                .map(|(other, _)| other.clone())
        })
        .collect::<Vec<_>>();
    roots.dedup();
    if roots.len() > 1 {
        warn!(%category, ?roots, "seed refers to several seeds, using the first");
    }
    roots.into_iter().next()
}
