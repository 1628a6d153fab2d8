//! Error types for color parsing and conversion.

use thiserror::Error;

/// Errors raised by the color adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ColorError {
    /// The input cannot be interpreted as a color in any known notation.
    #[error("Cannot parse color '{input}': {reason}")]
    Parse {
        /// The offending input text.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// A color space name that is not registered.
    #[error("Unknown color space: {0}")]
    UnknownColorSpace(String),
}

impl ColorError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for color operations.
pub type Result<T> = std::result::Result<T, ColorError>;
