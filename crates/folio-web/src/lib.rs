#![forbid(unsafe_code)]

//! `folio-web` runs the folio effect engines without a browser.
//!
//! Design goals:
//! - **Host-driven time**: the embedder advances a virtual clock explicitly;
//!   timers and frames fire only inside [`page::Page::step`].
//! - **Fixed layout**: element geometry comes from a [`LayoutMap`] table.
//! - **Observable output**: drawing lands in a [`RecordingSurface`] log.
//!
//! The browser crate reuses the engines with real adapters; this crate is the
//! reference host for tests, replays, and server-side previews of effect
//! timing.

pub mod layout;
pub mod page;
pub mod scheduler;
pub mod smooth_scroll;
pub mod surface;

use core::time::Duration;

pub use layout::LayoutMap;
pub use page::{EngineId, Page, PageEvent, PageStep};
pub use scheduler::ManualScheduler;
pub use smooth_scroll::SmoothScroll;
pub use surface::{DrawOp, RecordingSurface};

#[cfg(feature = "tracing-json")]
pub use folio_core::logging::init_json_logging;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
