//! Custom-property environment binding for swatch.
//!
//! An [`Environment`] wraps a [`StyleHost`] (the style root that owns the
//! declarations) with name normalization, a write cache, enumeration and
//! color evaluation. [`MemoryStyleHost`] is the in-process host used by the
//! CLI and tests.

mod css;
pub mod environment;
pub mod error;
pub mod host;
pub mod name;

pub use environment::{EnumerationStrategy, Environment};
pub use error::{EnvError, Result};
pub use host::{MemoryStyleHost, StyleHost};
pub use name::{normalize_property_name, prefixed_property_name};
