//! Advisory "recalculating" marker for the UI.

use crate::category::CategoryId;
use crate::store::ColorState;

/// Records which category has an edit in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatingFlag {
    category: Option<CategoryId>,
}

impl CalculatingFlag {
    pub fn set(&mut self, category: CategoryId) {
        self.category = Some(category);
    }

    pub fn clear(&mut self) {
        self.category = None;
    }

    pub fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    /// True for the flagged category and for categories relative to it.
    pub fn is_calculating(&self, category: &str, state: &ColorState) -> bool {
        let Some(flagged) = &self.category else {
            return false;
        };
        flagged.as_str() == category
            || state.get(category).is_some_and(|entry| {
                entry.is_relative && entry.relative_to == *flagged
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::TextColors;
    use crate::store::{CategoryMap, CategoryState};
    use swatch_color::ColorValue;

    fn state() -> ColorState {
        let black = ColorValue::from_rgb8(0, 0, 0);
        let mut map = CategoryMap::new();
        for (name, root) in [("primary", None), ("secondary", Some("primary")), ("brand", None)] {
            let state = match root {
                Some(root) => CategoryState::relative(name.into(), black, root.into()),
                None => CategoryState::root(name.into(), black),
            };
            map.insert(name.into(), state);
        }
        let text = TextColors {
            base: black,
            contrast: ColorValue::from_rgb8(255, 255, 255),
        };
        ColorState::new(map, text).unwrap()
    }

    #[test]
    fn test_flag_covers_dependents() {
        let state = state();
        let mut flag = CalculatingFlag::default();
        assert!(!flag.is_calculating("primary", &state));

        flag.set("primary".into());
        assert!(flag.is_calculating("primary", &state));
        assert!(flag.is_calculating("secondary", &state));
        assert!(!flag.is_calculating("brand", &state));

        flag.clear();
        assert!(!flag.is_calculating("secondary", &state));
    }
}
