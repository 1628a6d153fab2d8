//! Style hosts: the external root that owns custom-property declarations.

use indexmap::IndexMap;

use crate::css::{parse_declaration_list, parse_stylesheet};
use crate::error::Result;

/// The style root a [`crate::Environment`] reads from and writes to.
///
/// A host carries stylesheet-level declarations plus inline declarations on
/// the root element. The computed value of a property is its inline value if
/// present, otherwise its stylesheet value.
pub trait StyleHost {
    /// Whether a style root exists.
    fn has_root(&self) -> bool {
        true
    }

    /// Inline declarations serialized as css text.
    fn inline_css_text(&self) -> String;

    /// Replace all inline declarations with those in `css_text`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedDeclaration`](crate::EnvError::MalformedDeclaration)
    /// if `css_text` cannot be parsed. The inline declarations are left
    /// untouched in that case.
    fn set_inline_css_text(&mut self, css_text: &str) -> Result<()>;

    /// Set one inline declaration.
    fn set_inline_property(&mut self, name: &str, value: &str);

    /// Computed value of `name`.
    fn computed_property(&self, name: &str) -> Option<String>;

    /// Number of computed properties, for indexed enumeration.
    fn computed_len(&self) -> usize;

    /// Name of the computed property at `index`.
    fn computed_item(&self, index: usize) -> Option<String>;

    /// All computed properties at once, when the host supports it.
    fn computed_property_map(&self) -> Option<Vec<(String, String)>> {
        None
    }
}

/// In-memory [`StyleHost`].
#[derive(Debug, Clone)]
pub struct MemoryStyleHost {
    stylesheet: IndexMap<String, String>,
    inline: IndexMap<String, String>,
    attached: bool,
    property_map: bool,
}

impl Default for MemoryStyleHost {
    fn default() -> Self {
        Self {
            stylesheet: IndexMap::new(),
            inline: IndexMap::new(),
            attached: true,
            property_map: true,
        }
    }
}

impl MemoryStyleHost {
    /// Empty host with a style root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose stylesheet declarations come from `css`.
    ///
    /// Declarations inside `:root` or `html` rules are collected; other rules
    /// and at-rules are ignored. Text without any rule block is read as a bare
    /// declaration list.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedDeclaration`](crate::EnvError::MalformedDeclaration) for
    /// declarations without a `:` inside a root rule.
    pub fn from_stylesheet(css: &str) -> Result<Self> {
        let mut host = Self::new();
        for (name, value) in parse_stylesheet(css)? {
            host.stylesheet.insert(name, value);
        }
        Ok(host)
    }

    /// Host without a style root.
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::default()
        }
    }

    /// Toggle support for [`StyleHost::computed_property_map`].
    #[must_use]
    pub fn with_property_map(mut self, enabled: bool) -> Self {
        self.property_map = enabled;
        self
    }

    /// Add or replace a stylesheet-level declaration.
    pub fn declare(&mut self, name: &str, value: &str) {
        self.stylesheet
            .insert(name.trim().to_string(), value.trim().to_string());
    }

    fn computed_names(&self) -> impl Iterator<Item = &String> {
        self.stylesheet.keys().chain(
            self.inline
                .keys()
                .filter(|name| !self.stylesheet.contains_key(*name)),
        )
    }
}

impl StyleHost for MemoryStyleHost {
    fn has_root(&self) -> bool {
        self.attached
    }

    fn inline_css_text(&self) -> String {
        self.inline
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn set_inline_css_text(&mut self, css_text: &str) -> Result<()> {
        let declarations = parse_declaration_list(css_text)?;
        self.inline = declarations.into_iter().collect();
        Ok(())
    }

    fn set_inline_property(&mut self, name: &str, value: &str) {
        self.inline
            .insert(name.trim().to_string(), value.trim().to_string());
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        self.inline
            .get(name)
            .or_else(|| self.stylesheet.get(name))
            .cloned()
    }

    fn computed_len(&self) -> usize {
        self.computed_names().count()
    }

    fn computed_item(&self, index: usize) -> Option<String> {
        self.computed_names().nth(index).cloned()
    }

    fn computed_property_map(&self) -> Option<Vec<(String, String)>> {
        if !self.property_map {
            return None;
        }
        Some(
            self.computed_names()
                .filter_map(|name| {
                    self.computed_property(name)
                        .map(|value| (name.clone(), value))
                })
                .collect(),
        )
    }
}
