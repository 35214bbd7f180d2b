#![forbid(unsafe_code)]

//! Element handles and the geometry measurement capability.

use crate::geometry::Rect;

/// Handle to a rendered element supplied by the view layer.
///
/// `owner` identifies the mounted component; `slot` distinguishes its parts
/// (slot 0 is the component root, children count from 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub owner: u32,
    pub slot: u32,
}

impl ElementId {
    /// Root element of component `owner`.
    #[inline]
    pub const fn root(owner: u32) -> Self {
        Self { owner, slot: 0 }
    }

    /// The `index`-th child of this element's component.
    #[inline]
    pub const fn child(self, index: usize) -> Self {
        Self {
            owner: self.owner,
            slot: (index as u32).saturating_add(1),
        }
    }
}

/// Live layout query.
///
/// Returns `None` when the element is not mounted or not laid out yet;
/// callers skip the dependent update instead of failing.
pub trait Measure {
    /// Bounding rectangle of `element` in viewport coordinates.
    fn measure(&self, element: ElementId) -> Option<Rect>;

    /// The visible viewport in the same coordinate space.
    fn viewport(&self) -> Option<Rect>;

    /// Whether `element` currently overlaps the viewport.
    ///
    /// `None` if either rectangle is unavailable.
    fn is_visible(&self, element: ElementId) -> Option<bool> {
        let rect = self.measure(element)?;
        let viewport = self.viewport()?;
        Some(!rect.is_empty() && rect.intersects(&viewport))
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn measure(&self, element: ElementId) -> Option<Rect> {
        (**self).measure(element)
    }

    fn viewport(&self) -> Option<Rect> {
        (**self).viewport()
    }

    fn is_visible(&self, element: ElementId) -> Option<bool> {
        (**self).is_visible(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneBox(Option<Rect>);

    impl Measure for OneBox {
        fn measure(&self, element: ElementId) -> Option<Rect> {
            (element == ElementId::root(1)).then_some(self.0).flatten()
        }

        fn viewport(&self) -> Option<Rect> {
            Some(Rect::new(0.0, 0.0, 1024.0, 768.0))
        }
    }

    #[test]
    fn child_ids_are_distinct_from_root() {
        let root = ElementId::root(4);
        assert_eq!(root.child(0), ElementId { owner: 4, slot: 1 });
        assert_ne!(root.child(0), root);
        assert_eq!(root.child(2).child(0), root.child(0));
    }

    #[test]
    fn visibility_uses_viewport_overlap() {
        let above = OneBox(Some(Rect::new(0.0, -300.0, 100.0, 200.0)));
        assert_eq!(above.is_visible(ElementId::root(1)), Some(false));
        let inside = OneBox(Some(Rect::new(0.0, 700.0, 100.0, 200.0)));
        assert_eq!(inside.is_visible(ElementId::root(1)), Some(true));
    }

    #[test]
    fn unmounted_element_has_unknown_visibility() {
        let m = OneBox(None);
        assert_eq!(m.is_visible(ElementId::root(1)), None);
        assert_eq!(m.is_visible(ElementId::root(2)), None);
    }
}
