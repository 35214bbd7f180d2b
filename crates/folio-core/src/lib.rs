#![forbid(unsafe_code)]

//! Core: platform-free primitives shared by the folio visual-effect engines.
//!
//! Nothing in this crate touches a browser. Engines in `folio-fx` reach the
//! outside world only through the capabilities defined here:
//!
//! - [`schedule::Scheduler`] for timers and frame callbacks,
//! - [`measure::Measure`] for element geometry,
//! - [`random::RandomSource`] / [`random::GlyphSource`] for randomness,
//! - [`signal::ThemeSignal`] and [`signal::ScrollSignal`] for ambient state.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod measure;
pub mod random;
pub mod reactive;
pub mod schedule;
pub mod signal;

// Without `tracing` the no-op macros are already exported at the root.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
