//! Color adapter for swatch.
//!
//! Wraps perceptual color conversion (OKLCH, OKLAB, HSL, sRGB) behind a
//! single [`ColorValue`] type and evaluates CSS color expressions, including
//! relative colors (`oklch(from var(--seed) calc(l + 0.1) c h)`).
//!
//! # Usage
//!
//! ```
//! use swatch_color::{ColorSpace, parse};
//!
//! let seed = parse("#3366CC").unwrap();
//! assert_eq!(seed.to_hex(), "#3366cc");
//!
//! let lighter = parse("oklch(from #3366cc calc(l + 0.1) c h)").unwrap();
//! assert!(lighter.contrast_lstar(&seed) > 0.0);
//! assert_eq!(lighter.space(), ColorSpace::Oklch);
//! ```

mod css;
pub mod error;
pub mod format;
pub mod parse;
pub mod space;
pub mod value;
pub mod vars;

pub use error::{ColorError, Result};
pub use format::format_number;
pub use parse::{parse, parse_with};
pub use space::ColorSpace;
pub use value::{CHANNEL_EPSILON, ColorValue, contrast_lstar, convert, to_hex};
pub use vars::{MAX_VAR_DEPTH, PropertyLookup, referenced_properties, substitute_vars};
