//! Palette derivation and color state synchronization for swatch.
//!
//! # Architecture
//!
//! ```text
//! Environment ──► resolver ──► deriver ──► ColorState
//!      ▲                                       │
//!      └──────── Session::input / commit ◄─────┘
//! ```
//!
//! - [`resolver`]: rewrites references into relative color syntax and
//!   evaluates them against the environment
//! - [`deriver`]: the nine-step lighten/darken ladder per seed
//! - [`store`]: immutable [`ColorState`] and its reducer
//! - [`debounce`] and [`calculating`]: commit timing and the UI busy marker
//! - [`session`]: ties the above to one environment
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use swatch_core::{ManualClock, Clock, Session, ThemeConfig};
//!
//! let config = ThemeConfig::default();
//! let mut session = Session::initialize(&config, config.build_host().unwrap()).unwrap();
//! assert_eq!(session.state().get("primary").unwrap().value, "#3366cc");
//!
//! let clock = ManualClock::new();
//! session.input("primary", "#cc3366", clock.now()).unwrap();
//! clock.advance(Duration::from_millis(50));
//! let committed = session.tick(clock.now()).unwrap();
//! assert_eq!(committed.len(), 1);
//! ```

pub mod calculating;
pub mod category;
pub mod config;
pub mod debounce;
pub mod deriver;
pub mod error;
pub mod resolver;
pub mod session;
pub mod store;

pub use calculating::CalculatingFlag;
pub use category::{CONTRAST_THRESHOLD, CategoryId, ColorToken, LadderStep, TextColor, TextColors};
pub use config::{DEFAULT_STYLESHEET, ThemeConfig};
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use deriver::{PaletteDeriver, Seed};
pub use error::{CoreError, Result};
pub use resolver::{SpaceFamily, relative_expression, resolve, resolve_hex};
pub use session::Session;
pub use store::{Action, CategoryMap, CategoryPatch, CategoryState, ColorState, VariantState};
