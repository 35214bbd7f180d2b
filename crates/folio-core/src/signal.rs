#![forbid(unsafe_code)]

//! Ambient signals: the current theme and the document scroll position.
//!
//! Both are owned and mutated by the surrounding application. Engines take a
//! cloned handle as an injected dependency and only read or subscribe; no
//! engine ever writes to an ambient signal.

use crate::reactive::{Observable, Subscription, Watch};

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Site color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// Light variant.
    #[default]
    Light,
    /// Dark variant.
    Dark,
}

impl Theme {
    /// The other variant.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is the dark variant.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Parse a theme name as stored by the site (`"light"` / `"dark"`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Shared theme context: current value, toggle, and change notification.
#[derive(Debug, Clone)]
pub struct ThemeSignal {
    value: Observable<Theme>,
}

impl ThemeSignal {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            value: Observable::new(theme),
        }
    }

    /// Current theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.value.get()
    }

    /// Replace the theme. Returns `true` if it changed.
    pub fn set(&self, theme: Theme) -> bool {
        self.value.set(theme)
    }

    /// Flip between light and dark. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.value.set(next);
        next
    }

    /// Invoke `callback` after every theme change.
    pub fn subscribe(&self, callback: impl Fn(Theme) + 'static) -> Subscription {
        self.value.subscribe(move |theme| callback(*theme))
    }

    /// Latch theme changes for polling.
    #[must_use]
    pub fn watch(&self) -> Watch<Theme> {
        Watch::new(&self.value)
    }

    /// Number of changes applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.value.version()
    }
}

impl Default for ThemeSignal {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ---------------------------------------------------------------------------
// Scroll
// ---------------------------------------------------------------------------

/// Vertical scroll state of the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset (`window.scrollY`).
    pub offset_y: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
    /// Full scrollable height of the document.
    pub document_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(offset_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            offset_y,
            viewport_height,
            document_height,
        }
    }

    /// Largest reachable scroll offset.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Scroll progress from top (0.0) to bottom (1.0).
    ///
    /// A document that cannot scroll reports 0.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let max = self.max_offset();
        if max <= 0.0 || !self.offset_y.is_finite() {
            return 0.0;
        }
        (self.offset_y / max).clamp(0.0, 1.0)
    }
}

/// Shared scroll-position signal.
#[derive(Debug, Clone)]
pub struct ScrollSignal {
    value: Observable<ScrollMetrics>,
}

impl ScrollSignal {
    #[must_use]
    pub fn new(metrics: ScrollMetrics) -> Self {
        Self {
            value: Observable::new(metrics),
        }
    }

    /// Current metrics.
    #[must_use]
    pub fn current(&self) -> ScrollMetrics {
        self.value.get()
    }

    /// Current vertical offset.
    #[must_use]
    pub fn offset_y(&self) -> f64 {
        self.value.with(|m| m.offset_y)
    }

    /// Publish new metrics (e.g. after a resize).
    pub fn set(&self, metrics: ScrollMetrics) -> bool {
        self.value.set(metrics)
    }

    /// Publish a new offset, clamped to the scrollable range.
    pub fn scroll_to(&self, offset_y: f64) -> bool {
        self.value.update(|m| {
            m.offset_y = offset_y.clamp(0.0, m.max_offset());
        })
    }

    /// Invoke `callback` after every scroll change.
    pub fn subscribe(&self, callback: impl Fn(&ScrollMetrics) + 'static) -> Subscription {
        self.value.subscribe(callback)
    }

    /// Latch scroll changes for polling.
    #[must_use]
    pub fn watch(&self) -> Watch<ScrollMetrics> {
        Watch::new(&self.value)
    }
}

impl Default for ScrollSignal {
    fn default() -> Self {
        Self::new(ScrollMetrics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn toggle_flips_and_notifies() {
        let theme = ThemeSignal::new(Theme::Light);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = theme.subscribe(move |t| s.borrow_mut().push(t));
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
        assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
        assert_eq!(theme.version(), 2);
    }

    #[test]
    fn theme_parse_roundtrip() {
        for t in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(t.as_str()), Some(t));
        }
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
        assert_eq!(Theme::parse("system"), None);
    }

    #[test]
    fn progress_spans_scrollable_range() {
        let m = ScrollMetrics::new(0.0, 800.0, 2800.0);
        assert_eq!(m.progress(), 0.0);
        assert_eq!(ScrollMetrics { offset_y: 1000.0, ..m }.progress(), 0.5);
        assert_eq!(ScrollMetrics { offset_y: 2000.0, ..m }.progress(), 1.0);
        assert_eq!(ScrollMetrics { offset_y: 5000.0, ..m }.progress(), 1.0);
    }

    #[test]
    fn unscrollable_document_has_zero_progress() {
        let m = ScrollMetrics::new(10.0, 800.0, 600.0);
        assert_eq!(m.max_offset(), 0.0);
        assert_eq!(m.progress(), 0.0);
    }

    #[test]
    fn scroll_to_clamps() {
        let scroll = ScrollSignal::new(ScrollMetrics::new(0.0, 500.0, 1500.0));
        scroll.scroll_to(4000.0);
        assert_eq!(scroll.offset_y(), 1000.0);
        scroll.scroll_to(-20.0);
        assert_eq!(scroll.offset_y(), 0.0);
    }
}
