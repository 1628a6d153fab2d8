//! Color state store.
//!
//! [`ColorState`] is an immutable value; [`ColorState::reduce`] returns the
//! next state for an [`Action`]. The category map is shared behind an `Arc`
//! and replaced on every accepted action, so a changed `current` can be
//! detected by pointer comparison.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use swatch_color::{ColorValue, parse};
use tracing::{debug, warn};

use crate::category::{CategoryId, ColorToken, TextColor, TextColors};
use crate::error::{CoreError, Result};

/// Precision of [`VariantState::computed_value`].
pub const COMPUTED_VALUE_PRECISION: usize = 2;

/// Categories in display order.
pub type CategoryMap = IndexMap<CategoryId, CategoryState>;

// =============================================================================
// STATE
// =============================================================================

/// One resolved ladder position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantState {
    pub token: ColorToken,
    /// Resolved color in OKLCH.
    pub resolved: ColorValue,
    /// CSS serialization of `resolved`.
    pub computed_value: String,
    pub hex_value: String,
    pub contrasting_text_color: TextColor,
}

impl VariantState {
    pub fn new(token: ColorToken, resolved: ColorValue, text: &TextColors) -> Self {
        Self {
            computed_value: resolved.to_css_string(COMPUTED_VALUE_PRECISION),
            hex_value: resolved.to_hex(),
            contrasting_text_color: TextColor::for_background(&resolved, &text.base),
            token,
            resolved,
        }
    }
}

/// State of one seed category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryState {
    pub category: CategoryId,
    /// Seed as lowercase `#rrggbb`.
    pub value: String,
    pub color: ColorValue,
    pub is_relative: bool,
    /// The root this category derives from; itself for roots.
    pub relative_to: CategoryId,
    /// Set once the category has been edited directly.
    pub has_changed: bool,
    pub variants: Vec<VariantState>,
}

impl CategoryState {
    /// A root category.
    pub fn root(category: CategoryId, color: ColorValue) -> Self {
        Self {
            relative_to: category.clone(),
            category,
            value: color.to_hex(),
            color,
            is_relative: false,
            has_changed: false,
            variants: Vec::new(),
        }
    }

    /// A category derived from `relative_to`.
    pub fn relative(category: CategoryId, color: ColorValue, relative_to: CategoryId) -> Self {
        Self {
            is_relative: true,
            relative_to,
            ..Self::root(category, color)
        }
    }

    #[must_use]
    pub fn with_variants(mut self, variants: Vec<VariantState>) -> Self {
        self.variants = variants;
        self
    }
}

/// Partial update merged into a [`CategoryState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPatch {
    /// New seed in any color notation; stored as hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantState>>,
}

impl CategoryPatch {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Merge into `state`. An unparsable value is logged and the previous
    /// value kept.
    pub fn apply(&self, state: &CategoryState) -> CategoryState {
        let mut next = state.clone();
        if let Some(value) = &self.value {
            match parse(value) {
                Ok(color) => {
                    next.value = color.to_hex();
                    next.color = color;
                }
                Err(error) => {
                    warn!(category = %state.category, %error, "ignoring unparsable color value");
                }
            }
        }
        if let Some(has_changed) = self.has_changed {
            next.has_changed = has_changed;
        }
        if let Some(variants) = &self.variants {
            next.variants.clone_from(variants);
        }
        next
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Store actions, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Merge `payload` into one category.
    #[serde(alias = "UPDATE_COLOR")]
    SetColor {
        category: CategoryId,
        payload: CategoryPatch,
    },

    /// Merge each entry into its category.
    SetAllColors {
        payload: IndexMap<CategoryId, CategoryPatch>,
    },

    /// Restore the initial state.
    Reset,

    /// Any other action type; ignored.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// STORE
// =============================================================================

/// Current and initial category states plus the parsed text colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorState {
    current: Arc<CategoryMap>,
    initial: Arc<CategoryMap>,
    text_colors: TextColors,
}

impl ColorState {
    /// Build a store whose initial and current states are `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCategory`] if a relation names a missing
    /// category and [`CoreError::ChainedRelation`] if a category is relative
    /// to another relative category or a root names something other than
    /// itself.
    pub fn new(categories: CategoryMap, text_colors: TextColors) -> Result<Self> {
        validate_relations(&categories)?;
        let categories = Arc::new(categories);
        Ok(Self {
            current: Arc::clone(&categories),
            initial: categories,
            text_colors,
        })
    }

    pub fn current(&self) -> &CategoryMap {
        &self.current
    }

    pub fn initial(&self) -> &CategoryMap {
        &self.initial
    }

    pub fn text_colors(&self) -> &TextColors {
        &self.text_colors
    }

    pub fn get(&self, category: &str) -> Option<&CategoryState> {
        self.current.get(category)
    }

    /// Whether both states share the same `current` map.
    pub fn same_current(&self, other: &ColorState) -> bool {
        Arc::ptr_eq(&self.current, &other.current)
    }

    /// Categories relative to `root`, in display order.
    pub fn dependents_of<'a>(
        &'a self,
        root: &'a str,
    ) -> impl Iterator<Item = &'a CategoryState> + 'a {
        self.current.values().filter(move |state| {
            state.is_relative && state.relative_to.as_str() == root
        })
    }

    /// Next state after `action`.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> ColorState {
        match action {
            Action::SetColor { category, payload } => {
                let Some(state) = self.current.get(category) else {
                    warn!(%category, "SET_COLOR for unknown category ignored");
                    return self.clone();
                };
                let mut current = CategoryMap::clone(&self.current);
                current.insert(category.clone(), payload.apply(state));
                self.with_current(current)
            }
            Action::SetAllColors { payload } => {
                let mut current = CategoryMap::clone(&self.current);
                let mut applied = 0usize;
                for (category, patch) in payload {
                    match current.get_mut(category) {
                        Some(state) => {
                            *state = patch.apply(state);
                            applied += 1;
                        }
                        None => warn!(%category, "SET_ALL_COLORS entry for unknown category ignored"),
                    }
                }
                if applied == 0 {
                    return self.clone();
                }
                self.with_current(current)
            }
            Action::Reset => Self {
                current: Arc::clone(&self.initial),
                ..self.clone()
            },
            Action::Unknown => {
                debug!("unknown action ignored");
                self.clone()
            }
        }
    }

    fn with_current(&self, current: CategoryMap) -> ColorState {
        Self {
            current: Arc::new(current),
            initial: Arc::clone(&self.initial),
            text_colors: self.text_colors,
        }
    }
}

fn validate_relations(categories: &CategoryMap) -> Result<()> {
    for state in categories.values() {
        if !state.is_relative {
            if state.relative_to != state.category {
                return Err(CoreError::ChainedRelation {
                    category: state.category.clone(),
                    relative_to: state.relative_to.clone(),
                });
            }
            continue;
        }
        let root = categories
            .get(&state.relative_to)
            .ok_or_else(|| CoreError::UnknownCategory(state.relative_to.clone()))?;
        if root.is_relative || root.category == state.category {
            return Err(CoreError::ChainedRelation {
                category: state.category.clone(),
                relative_to: state.relative_to.clone(),
            });
        }
    }
    Ok(())
}
