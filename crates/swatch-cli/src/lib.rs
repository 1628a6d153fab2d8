//! Library components of the swatch command-line driver.

pub mod logging;
pub mod output;
pub mod replay;
pub mod theme;
