//! Visual-effect engines for the folio site.
//!
//! Every engine is a plain state machine. It owns no closures, spawns no
//! timers on its own, and reaches the page only through the capabilities in
//! `folio-core` ([`Scheduler`](folio_core::schedule::Scheduler),
//! [`Measure`](folio_core::measure::Measure), the random sources, and the
//! theme/scroll signals) plus the [`Surface`] drawing trait defined here.
//!
//! | Module | Engine | Driven by |
//! |--------|--------|-----------|
//! | [`scramble`] | [`ScrambleReveal`] | element events + step timer |
//! | [`focus`] | [`FocusTracker`] | cycle timer or pointer |
//! | [`particles`] | [`ParticleSimulator`] | theme signal + frame callbacks |
//! | [`scroll_toggle`] | [`ScrollThresholdToggle`] | scroll signal |
//!
//! # Features
//!
//! - `tracing`: route engine logging through `tracing`.
//! - `serde`: derive `Serialize`/`Deserialize` for engine configs.

#![forbid(unsafe_code)]

pub mod error;
pub mod focus;
pub mod particles;
pub mod policy;
pub mod scramble;
pub mod scroll_toggle;
pub mod surface;

#[cfg(feature = "serde")]
mod serde_ms;

pub use error::ConfigError;
pub use focus::{FocusConfig, FocusMode, FocusTracker, HighlightOverlay};
pub use particles::{Particle, ParticleConfig, ParticleField, ParticleSimulator};
pub use policy::FxPolicy;
pub use scramble::{
    DEFAULT_ALPHABET, RevealDirection, ScrambleConfig, ScramblePhase, ScrambleReveal, TriggerMode,
};
pub use scroll_toggle::{ScrollBehavior, ScrollRequest, ScrollThresholdConfig, ScrollThresholdToggle};
pub use surface::{Rgba, Surface};
