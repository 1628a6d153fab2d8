//! Environment error types.

use swatch_color::ColorError;
use thiserror::Error;

/// Errors raised by the environment binding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// The host has no style root to read from or write to.
    #[error("Style environment is unavailable")]
    Unavailable,

    /// A property value could not be evaluated as a color.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// A declaration in css text could not be split into name and value.
    #[error("Malformed declaration '{declaration}': {reason}")]
    MalformedDeclaration {
        declaration: String,
        reason: &'static str,
    },
}

/// Result alias for environment operations.
pub type Result<T> = std::result::Result<T, EnvError>;
