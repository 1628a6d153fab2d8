//! Cached access to custom properties on a [`StyleHost`].

use std::collections::HashMap;

use indexmap::IndexMap;
use swatch_color::{ColorSpace, ColorValue, PropertyLookup, parse_with};
use tracing::{debug, trace};

use crate::error::{EnvError, Result};
use crate::host::StyleHost;
use crate::name::{normalize_property_name, prefixed_property_name};

/// Precision used when serializing evaluated colors.
const COMPUTED_PRECISION: usize = 4;

/// How [`Environment::get_all_properties`] enumerates the host.
///
/// Every strategy yields the same properties; they differ only in which host
/// capability they use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumerationStrategy {
    /// Use the host's structured property map.
    PropertyMap,
    /// Walk computed declarations by index.
    ComputedScan,
    /// Property map when supported, otherwise an index scan.
    #[default]
    Auto,
}

/// Reads and writes custom properties on a style root.
///
/// Writes go to the host's inline declarations and are remembered in a
/// cache that reads consult first.
#[derive(Debug)]
pub struct Environment<H> {
    host: H,
    cache: HashMap<String, String>,
}

impl<H: StyleHost> Environment<H> {
    /// Bind to `host`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Unavailable`] if the host has no style root.
    pub fn new(host: H) -> Result<Self> {
        if !host.has_root() {
            return Err(EnvError::Unavailable);
        }
        Ok(Self {
            host,
            cache: HashMap::new(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Write `value` to `name`, returning the normalized name written.
    pub fn set_property(&mut self, name: &str, value: &str) -> String {
        let name = normalize_property_name(name);
        self.write(name, value)
    }

    /// Write `value` to `name` scoped under `prefix` (`--prefix-name`).
    pub fn set_property_with_prefix(&mut self, name: &str, value: &str, prefix: &str) -> String {
        let name = prefixed_property_name(name, prefix);
        self.write(name, value)
    }

    /// Write several properties in order.
    pub fn set_properties<'a, I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, value) in properties {
            self.set_property(name, value);
        }
    }

    fn write(&mut self, name: String, value: &str) -> String {
        let value = value.trim();
        trace!(property = %name, value, "set property");
        self.host.set_inline_property(&name, value);
        self.cache.insert(name.clone(), value.to_string());
        name
    }

    /// Current value of `name`: cached write first, then the computed style.
    pub fn get_property(&self, name: &str) -> Option<String> {
        let name = normalize_property_name(name);
        if let Some(value) = self.cache.get(&name) {
            return (!value.is_empty()).then(|| value.clone());
        }
        self.host
            .computed_property(&name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Values of several properties, keyed by normalized name.
    pub fn get_properties<'a, I>(&self, names: I) -> IndexMap<String, Option<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| (normalize_property_name(name), self.get_property(name)))
            .collect()
    }

    /// Every custom property visible on the root.
    pub fn get_all_properties(&self, strategy: EnumerationStrategy) -> IndexMap<String, String> {
        let entries = match strategy {
            EnumerationStrategy::ComputedScan => self.scan_computed(),
            EnumerationStrategy::PropertyMap | EnumerationStrategy::Auto => {
                match self.host.computed_property_map() {
                    Some(entries) => entries,
                    None => {
                        debug!(?strategy, "property map unsupported, scanning computed style");
                        self.scan_computed()
                    }
                }
            }
        };
        entries
            .into_iter()
            .filter(|(name, _)| name.starts_with("--"))
            .map(|(name, value)| (name, value.trim().to_string()))
            .collect()
    }

    fn scan_computed(&self) -> Vec<(String, String)> {
        (0..self.host.computed_len())
            .filter_map(|index| self.host.computed_item(index))
            .filter_map(|name| {
                let value = self.host.computed_property(&name)?;
                Some((name, value))
            })
            .collect()
    }

    /// Evaluate a color expression against the current properties.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Color`] if the expression does not resolve to a
    /// color.
    pub fn evaluate_color(&self, expression: &str) -> Result<ColorValue> {
        Ok(parse_with(expression, self)?)
    }

    /// Evaluate `expression` and serialize the result as CSS.
    ///
    /// # Errors
    ///
    /// See [`Environment::evaluate_color`].
    pub fn compute(&self, expression: &str) -> Result<String> {
        Ok(self
            .evaluate_color(expression)?
            .to_css_string(COMPUTED_PRECISION))
    }

    /// Evaluate the property `name` as a color in `space`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Color`] if the property is undefined or not a
    /// color.
    pub fn compute_color_property(&self, name: &str, space: ColorSpace) -> Result<ColorValue> {
        let reference = format!("var({})", normalize_property_name(name));
        Ok(self.evaluate_color(&reference)?.convert(space))
    }

    /// Inline declarations, for a later [`Environment::reset_to_initial`].
    pub fn snapshot(&self) -> String {
        self.host.inline_css_text()
    }

    /// Replace the inline declarations with `snapshot` and drop cached writes.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedDeclaration`] if `snapshot` is not valid
    /// css text; nothing changes in that case.
    pub fn reset_to_initial(&mut self, snapshot: &str) -> Result<()> {
        self.host.set_inline_css_text(snapshot)?;
        self.cache.clear();
        debug!("environment reset to initial declarations");
        Ok(())
    }
}

impl<H: StyleHost> PropertyLookup for Environment<H> {
    fn lookup_property(&self, name: &str) -> Option<String> {
        self.get_property(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryStyleHost;

    fn env(css: &str) -> Environment<MemoryStyleHost> {
        Environment::new(MemoryStyleHost::from_stylesheet(css).unwrap()).unwrap()
    }

    #[test]
    fn test_detached_host_is_unavailable() {
        let err = Environment::new(MemoryStyleHost::detached()).unwrap_err();
        assert!(matches!(err, EnvError::Unavailable));
    }

    #[test]
    fn test_set_then_get_all_name_forms() {
        let mut env = env("");
        assert_eq!(env.set_property("var(--x)", " red "), "--x");
        assert_eq!(env.get_property("x").as_deref(), Some("red"));
        assert_eq!(env.get_property("--x").as_deref(), Some("red"));
        assert_eq!(env.get_property("var(--x)").as_deref(), Some("red"));
    }

    #[test]
    fn test_empty_write_reads_as_unset() {
        let mut env = env("--a: red;");
        env.set_property("--a", "  ");
        assert_eq!(env.get_property("--a"), None);
        assert_eq!(env.get_properties(["--a"])["--a"], None);
    }

    #[test]
    fn test_prefixed_write() {
        let mut env = env("");
        let written = env.set_property_with_prefix("primary", "#fff", "color");
        assert_eq!(written, "--color-primary");
        assert_eq!(env.get_property("--color-primary").as_deref(), Some("#fff"));
    }

    #[test]
    fn test_get_properties() {
        let env = env("--a: red;");
        let values = env.get_properties(["a", "--b"]);
        assert_eq!(values["--a"].as_deref(), Some("red"));
        assert_eq!(values["--b"], None);
    }

    #[test]
    fn test_strategies_agree() {
        let mut env = env("--a: red; --b: blue;");
        env.set_property("--c", "green");
        let map = env.get_all_properties(EnumerationStrategy::PropertyMap);
        let scan = env.get_all_properties(EnumerationStrategy::ComputedScan);
        let auto = env.get_all_properties(EnumerationStrategy::Auto);
        assert_eq!(map, scan);
        assert_eq!(map, auto);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_property_map_falls_back_to_scan() {
        let host = MemoryStyleHost::from_stylesheet("--a: red;")
            .unwrap()
            .with_property_map(false);
        let env = Environment::new(host).unwrap();
        let all = env.get_all_properties(EnumerationStrategy::PropertyMap);
        assert_eq!(all.get("--a").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_evaluate_relative_expression() {
        let env = env("--seed: #3366cc;");
        let color = env
            .evaluate_color("oklch(from var(--seed) l c h)")
            .unwrap();
        assert_eq!(color.to_hex(), "#3366cc");
        assert!(env.compute("var(--seed)").unwrap().starts_with("rgb("));
    }

    #[test]
    fn test_compute_color_property() {
        let env = env("--seed: #ff0000;");
        let color = env.compute_color_property("seed", ColorSpace::Hsl).unwrap();
        assert_eq!(color.space(), ColorSpace::Hsl);
        assert!(env.compute_color_property("missing", ColorSpace::Hsl).is_err());
    }

    #[test]
    fn test_reset_to_initial_clears_cache() {
        let mut env = env("--a: red;");
        let snapshot = env.snapshot();
        env.set_property("--a", "blue");
        assert_eq!(env.get_property("--a").as_deref(), Some("blue"));
        env.reset_to_initial(&snapshot).unwrap();
        assert_eq!(env.get_property("--a").as_deref(), Some("red"));
    }
}
