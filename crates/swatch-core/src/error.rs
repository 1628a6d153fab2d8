//! Core error types.

use std::path::PathBuf;

use swatch_color::ColorError;
use swatch_env::EnvError;
use thiserror::Error;

use crate::category::CategoryId;

/// Errors raised while building or driving a color session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Color(#[from] ColorError),

    /// A category that is not part of the configured palette.
    #[error("Unknown color category: {0}")]
    UnknownCategory(CategoryId),

    /// A seed or text property that is absent or does not parse as a color.
    #[error("Seed property {property} for '{category}' cannot be read: {reason}")]
    MissingSeed {
        category: String,
        property: String,
        reason: String,
    },

    /// A relative category points at another relative category.
    #[error("Category '{category}' is relative to '{relative_to}', which is itself relative")]
    ChainedRelation {
        category: CategoryId,
        relative_to: CategoryId,
    },

    #[error("Invalid theme configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse theme configuration")]
    Config(#[from] toml::de::Error),

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
