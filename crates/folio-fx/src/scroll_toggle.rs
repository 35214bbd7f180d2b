#![forbid(unsafe_code)]

//! One-bit scroll observer: visible once the page is scrolled past a
//! threshold. Drives the back-to-top button, the compact navbar and the
//! section markers.

use std::cell::Cell;
use std::rc::Rc;

use folio_core::reactive::Subscription;
use folio_core::signal::ScrollSignal;
use folio_core::trace;

use crate::error::ConfigError;

/// Threshold configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollThresholdConfig {
    /// Offset in px that must be exceeded. Default: 500.0
    pub threshold: f64,
}

impl Default for ScrollThresholdConfig {
    fn default() -> Self {
        Self::back_to_top()
    }
}

impl ScrollThresholdConfig {
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Floating back-to-top button.
    #[must_use]
    pub const fn back_to_top() -> Self {
        Self::new(500.0)
    }

    /// Navbar switching to its compact style.
    #[must_use]
    pub const fn navbar() -> Self {
        Self::new(20.0)
    }

    /// Section-level reveal.
    #[must_use]
    pub const fn section() -> Self {
        Self::new(300.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold.is_finite() && self.threshold >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold(self.threshold))
        }
    }
}

/// How a scroll request should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// A scroll the host should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Visibility flag recomputed on every scroll notification.
#[derive(Debug)]
pub struct ScrollThresholdToggle {
    config: ScrollThresholdConfig,
    visible: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}

impl ScrollThresholdToggle {
    #[must_use]
    pub fn new(config: ScrollThresholdConfig) -> Self {
        Self {
            config,
            visible: Rc::new(Cell::new(false)),
            subscription: None,
        }
    }

    /// Evaluate the current offset and follow every later change.
    ///
    /// Mounting twice replaces the previous subscription.
    pub fn mount(&mut self, scroll: &ScrollSignal) {
        self.unmount();
        let threshold = self.config.threshold;
        self.visible.set(scroll.offset_y() > threshold);
        let visible = Rc::clone(&self.visible);
        self.subscription = Some(scroll.subscribe(move |metrics| {
            let now = metrics.offset_y > threshold;
            if visible.replace(now) != now {
                trace!(visible = now, threshold, "scroll threshold crossed");
            }
        }));
    }

    /// Stop following scroll changes. The last value is kept.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Recompute from an explicit offset (hosts without a signal).
    pub fn update(&self, offset_y: f64) -> bool {
        let now = offset_y > self.config.threshold;
        self.visible.set(now);
        now
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// The action behind the control: smooth scroll to the document top.
    #[must_use]
    pub fn scroll_to_top(&self) -> ScrollRequest {
        ScrollRequest {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        }
    }
}
