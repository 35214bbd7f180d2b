#![forbid(unsafe_code)]

//! WASM bindings for the folio effects.
//!
//! The engines in `folio-fx` never touch the DOM; this crate supplies the
//! browser side of their capabilities and exports one JS class per effect:
//!
//! | JS class | engine |
//! |----------|--------|
//! | `FolioSignals` | shared theme / scroll / viewport signals |
//! | `ScrambleText` | scramble reveal on an element's text |
//! | `FocusText` | focus tracker over a container's words |
//! | `ParticleBackdrop` | dark-theme particle canvas |
//! | `ScrollToggle` | scroll-threshold boolean with scroll-to-top |
//!
//! Timers run on `setTimeout`, frames on `requestAnimationFrame`, geometry
//! comes from `getBoundingClientRect`. Every class has a `destroy()` that
//! cancels all pending browser callbacks.
//!
//! Option parsing ([`options`]) and handle bookkeeping ([`registry`]) are
//! platform-free and tested natively.

pub mod options;
pub mod registry;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FocusText, FolioSignals, ParticleBackdrop, ScrambleText, ScrollToggle};

pub use options::OptionsError;
pub use registry::TaskRegistry;

/// Native builds compile the bindings as a stub so `cargo check --workspace`
/// stays green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioSignals;

#[cfg(not(target_arch = "wasm32"))]
impl FolioSignals {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
