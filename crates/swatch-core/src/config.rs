//! Theme configuration.
//!
//! A theme is a TOML file; every section is optional and falls back to the
//! built-in demo theme.
//!
//! ```toml
//! [palette]
//! categories = ["primary", "secondary"]
//! step = 0.08
//!
//! [palette.relative_to]
//! secondary = "primary"
//!
//! [commit]
//! debounce_ms = 100
//!
//! [style]
//! path = "theme.css"
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use swatch_env::{MemoryStyleHost, StyleHost};

use crate::category::CategoryId;
use crate::error::{CoreError, Result};

/// Stylesheet used when a theme names none.
pub const DEFAULT_STYLESHEET: &str = r":root {
  --color-primary: #3366cc;
  --color-secondary: oklch(from var(--color-primary) l c calc(h + 120));
  --color-tertiary: oklch(from var(--color-primary) l c calc(h + 240));
  --color-accent: oklch(from var(--color-primary) calc(l + 0.1) calc(c * 1.2) calc(h + 180));
  --text-base: #1a1a1a;
  --text-contrast: #fafafa;
}
";

// =============================================================================
// ROOT CONFIG
// =============================================================================

/// Theme configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Categories and ladder settings.
    pub palette: PaletteConfig,

    /// Text color properties.
    pub text: TextConfig,

    /// Commit timing.
    pub commit: CommitConfig,

    /// Where declarations come from.
    pub style: StyleConfig,

    /// Directory relative style paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ThemeConfig {
    /// Parse and validate a theme from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] for TOML errors and
    /// [`CoreError::InvalidConfig`] for inconsistent settings.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a theme file. A relative `style.path` is resolved against the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read, otherwise as
    /// [`ThemeConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Check that categories are unique and relations name known categories.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let palette = &self.palette;
        if palette.categories.is_empty() {
            return Err(CoreError::InvalidConfig(
                "palette.categories is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for category in &palette.categories {
            if category.as_str().trim().is_empty() {
                return Err(CoreError::InvalidConfig(
                    "category names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(category) {
                return Err(CoreError::InvalidConfig(format!(
                    "category '{category}' is listed twice"
                )));
            }
        }
        if !palette.step.is_finite() || palette.step <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "palette.step must be positive, got {}",
                palette.step
            )));
        }
        let names = palette
            .seeds
            .keys()
            .chain(palette.relative_to.keys())
            .chain(palette.relative_to.values());
        for name in names {
            if !seen.contains(name) {
                return Err(CoreError::InvalidConfig(format!(
                    "'{name}' is not one of palette.categories"
                )));
            }
        }
        Ok(())
    }

    /// Property holding the seed of `category`.
    pub fn seed_property(&self, category: &CategoryId) -> String {
        self.palette
            .seeds
            .get(category)
            .map_or_else(|| format!("--color-{category}"), Clone::clone)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.commit.debounce_ms)
    }

    /// Stylesheet text: inline `style.stylesheet`, then `style.path`, then the
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if `style.path` cannot be read.
    pub fn stylesheet(&self) -> Result<Cow<'_, str>> {
        if let Some(text) = &self.style.stylesheet {
            return Ok(Cow::Borrowed(text));
        }
        let Some(path) = &self.style.path else {
            return Ok(Cow::Borrowed(DEFAULT_STYLESHEET));
        };
        let path = match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        };
        std::fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|source| CoreError::Io { path, source })
    }

    /// In-memory style host holding this theme's declarations.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] or [`CoreError::Env`] if the stylesheet or
    /// the inline css text cannot be read.
    pub fn build_host(&self) -> Result<MemoryStyleHost> {
        let mut host = MemoryStyleHost::from_stylesheet(&self.stylesheet()?)?;
        if let Some(inline) = &self.style.inline {
            host.set_inline_css_text(inline)?;
        }
        Ok(host)
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Palette settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Seed categories in display order.
    pub categories: Vec<CategoryId>,

    /// OKLCH lightness change per ladder step.
    pub step: f32,

    /// Seed property per category; defaults to `--color-{category}`.
    pub seeds: IndexMap<CategoryId, String>,

    /// Explicit relations; otherwise inferred from seed declarations.
    pub relative_to: IndexMap<CategoryId, CategoryId>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            categories: ["primary", "secondary", "tertiary", "accent"]
                .into_iter()
                .map(CategoryId::from)
                .collect(),
            step: 0.1,
            seeds: IndexMap::new(),
            relative_to: IndexMap::new(),
        }
    }
}

/// Text color properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub base: String,
    pub contrast: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            base: "--text-base".to_string(),
            contrast: "--text-contrast".to_string(),
        }
    }
}

/// Commit timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Quiet window after the last input before a commit, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self { debounce_ms: 50 }
    }
}

/// Declaration sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stylesheet text.
    pub stylesheet: Option<String>,

    /// Stylesheet file.
    pub path: Option<PathBuf>,

    /// Initial inline declarations on the root.
    pub inline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let config = ThemeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.palette.categories.len(), 4);
        assert_eq!(config.debounce_window(), Duration::from_millis(50));
        assert_eq!(
            config.seed_property(&CategoryId::from("accent")),
            "--color-accent"
        );
        let host = config.build_host().unwrap();
        assert!(host.computed_property("--text-contrast").is_some());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ThemeConfig::from_toml_str(
            r#"
            [palette]
            categories = ["brand", "muted"]
            step = 0.05

            [palette.seeds]
            brand = "--brand"

            [palette.relative_to]
            muted = "brand"
            "#,
        )
        .unwrap();
        assert_eq!(config.palette.step, 0.05);
        assert_eq!(config.seed_property(&"brand".into()), "--brand");
        assert_eq!(config.seed_property(&"muted".into()), "--color-muted");
        assert_eq!(config.text, TextConfig::default());
        assert_eq!(config.commit.debounce_ms, 50);
    }

    #[test]
    fn test_rejects_unknown_relation_target() {
        let err = ThemeConfig::from_toml_str(
            r#"
            [palette]
            categories = ["primary"]
            [palette.relative_to]
            primary = "other"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_step() {
        assert!(ThemeConfig::from_toml_str("[palette]\ncategories = [\"a\", \"a\"]").is_err());
        assert!(ThemeConfig::from_toml_str("[palette]\nstep = 0.0").is_err());
        assert!(matches!(
            ThemeConfig::from_toml_str("[palette]\nstep = \"big\""),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_inline_style_overrides_stylesheet() {
        let config = ThemeConfig::from_toml_str(
            r##"
            [style]
            inline = "--color-primary: #cc3366;"
            "##,
        )
        .unwrap();
        let host = config.build_host().unwrap();
        assert_eq!(
            host.computed_property("--color-primary").as_deref(),
            Some("#cc3366")
        );
    }
}
