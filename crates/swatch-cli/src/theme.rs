//! Theme loading and command-line edits.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use swatch_core::{Session, ThemeConfig};
use swatch_env::MemoryStyleHost;
use tracing::info;

/// Load `path` (or the built-in theme) and start a session over its
/// declarations.
pub fn load_session(path: Option<&Path>) -> Result<Session<MemoryStyleHost>> {
    let config = match path {
        Some(path) => ThemeConfig::load(path)
            .with_context(|| format!("load theme {}", path.display()))?,
        None => ThemeConfig::default(),
    };
    let host = config.build_host().context("read theme declarations")?;
    Session::initialize(&config, host).context("initialize color session")
}

/// A `CATEGORY=COLOR` edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub category: String,
    pub color: String,
}

impl FromStr for Edit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((category, color)) = s.split_once('=') else {
            bail!("expected CATEGORY=COLOR, got '{s}'");
        };
        let (category, color) = (category.trim(), color.trim());
        if category.is_empty() || color.is_empty() {
            bail!("expected CATEGORY=COLOR, got '{s}'");
        }
        Ok(Self {
            category: category.to_string(),
            color: color.to_string(),
        })
    }
}

/// Commit each edit in order.
pub fn apply_edits(session: &mut Session<MemoryStyleHost>, edits: &[Edit]) -> Result<()> {
    for edit in edits {
        session
            .commit(&edit.category, &edit.color)
            .with_context(|| format!("set {}={}", edit.category, edit.color))?;
        info!(category = %edit.category, color = %edit.color, "committed edit");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let edit: Edit = "primary = #CC3366".parse().unwrap();
        assert_eq!(edit.category, "primary");
        assert_eq!(edit.color, "#CC3366");
        assert!("primary".parse::<Edit>().is_err());
        assert!("=red".parse::<Edit>().is_err());
    }
}
