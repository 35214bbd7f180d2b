#![forbid(unsafe_code)]

//! Element-level input events delivered by the view layer.

/// An event on an element an engine is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementEvent {
    /// Pointer entered the element (`mouseenter`).
    PointerEnter,
    /// Pointer left the element (`mouseleave`).
    PointerLeave,
    /// Primary click.
    Click,
    /// Viewport intersection changed; `true` when the element became visible.
    Visibility(bool),
}

impl ElementEvent {
    /// Stable lowercase name, matching the DOM event the host listens for.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Click => "click",
            Self::Visibility(_) => "intersection",
        }
    }
}
