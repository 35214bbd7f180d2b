#![forbid(unsafe_code)]

//! Smooth scroll executor with exponential ease-out.
//!
//! Each frame closes a fixed fraction of the remaining distance to the
//! target, so the motion decelerates as it arrives.

use folio_core::signal::ScrollSignal;
use folio_fx::scroll_toggle::{ScrollBehavior, ScrollRequest};

/// Remaining distance (px) below which the scroll snaps to its target.
const SNAP_DISTANCE: f64 = 0.5;

/// Executes [`ScrollRequest`]s against a [`ScrollSignal`].
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    target: Option<f64>,
    /// Fraction of the remaining distance covered per frame.
    speed: f64,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl SmoothScroll {
    /// `speed` is clamped to `[0.05, 0.95]`.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        Self {
            target: None,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Begin executing `request`. Instant requests apply immediately.
    pub fn start(&mut self, request: ScrollRequest, scroll: &ScrollSignal) {
        match request.behavior {
            ScrollBehavior::Instant => {
                self.target = None;
                scroll.scroll_to(request.top);
            }
            ScrollBehavior::Smooth => self.target = Some(request.top),
        }
    }

    /// Advance one frame. Returns `true` while still moving.
    pub fn tick(&mut self, scroll: &ScrollSignal) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let current = scroll.offset_y();
        let remaining = target - current;
        if remaining.abs() < SNAP_DISTANCE {
            scroll.scroll_to(target);
            self.target = None;
            return false;
        }
        scroll.scroll_to(current + remaining * self.speed);
        true
    }

    /// Abandon the current request (e.g. the user scrolled manually).
    pub fn cancel(&mut self) {
        self.target = None;
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }
}
