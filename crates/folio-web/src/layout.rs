#![forbid(unsafe_code)]

//! Fixed element geometry for deterministic runs.

use std::collections::BTreeMap;

use folio_core::geometry::{Rect, Size};
use folio_core::measure::{ElementId, Measure};

/// Table of element rectangles implementing [`Measure`].
///
/// Rectangles are in document coordinates; the viewport is a window onto
/// the document that moves down as the page scrolls. Elements not in the
/// table are treated as unmounted.
#[derive(Debug, Default, Clone)]
pub struct LayoutMap {
    rects: BTreeMap<ElementId, Rect>,
    hidden: BTreeMap<ElementId, bool>,
    viewport: Option<Rect>,
}

impl LayoutMap {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Some(Rect::from_size(viewport)),
            ..Self::default()
        }
    }

    /// Place (or move) an element.
    pub fn insert(&mut self, element: ElementId, rect: Rect) -> Option<Rect> {
        self.rects.insert(element, rect)
    }

    /// Unmount an element.
    pub fn remove(&mut self, element: ElementId) -> Option<Rect> {
        self.hidden.remove(&element);
        self.rects.remove(&element)
    }

    /// Place a row of words inside `container`, left to right with `gap`
    /// between them. Word `i` becomes `container.child(i)`.
    pub fn insert_row(&mut self, container: ElementId, origin: Rect, widths: &[f64], gap: f64) {
        let mut x = origin.x;
        for (i, &width) in widths.iter().enumerate() {
            self.rects
                .insert(container.child(i), Rect::new(x, origin.y, width, origin.height));
            x += width + gap;
        }
        let total = (x - gap - origin.x).max(0.0);
        self.rects.insert(
            container,
            Rect::new(origin.x, origin.y, total, origin.height),
        );
    }

    /// Override the visibility answer for an element.
    pub fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.hidden.insert(element, !visible);
    }

    /// Resize the viewport, keeping its scroll position.
    pub fn set_viewport(&mut self, viewport: Size) {
        let top = self.viewport.map_or(0.0, |v| v.y);
        self.viewport = Some(Rect::new(0.0, top, viewport.width, viewport.height));
    }

    /// Move the viewport to document offset `offset_y`.
    pub fn set_scroll_offset(&mut self, offset_y: f64) {
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.y = offset_y;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl Measure for LayoutMap {
    fn measure(&self, element: ElementId) -> Option<Rect> {
        self.rects.get(&element).copied()
    }

    fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    fn is_visible(&self, element: ElementId) -> Option<bool> {
        if let Some(&hidden) = self.hidden.get(&element) {
            return Some(!hidden);
        }
        let rect = self.measure(element)?;
        let viewport = self.viewport?;
        Some(!rect.is_empty() && rect.intersects(&viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_elements_are_unmounted() {
        let layout = LayoutMap::new(Size::new(100.0, 100.0));
        assert_eq!(layout.measure(ElementId::root(1)), None);
        assert_eq!(layout.is_visible(ElementId::root(1)), None);
    }

    #[test]
    fn row_places_words_and_container() {
        let mut layout = LayoutMap::new(Size::new(800.0, 600.0));
        let c = ElementId::root(3);
        layout.insert_row(c, Rect::new(10.0, 20.0, 0.0, 30.0), &[40.0, 60.0], 8.0);
        assert_eq!(layout.measure(c.child(0)), Some(Rect::new(10.0, 20.0, 40.0, 30.0)));
        assert_eq!(layout.measure(c.child(1)), Some(Rect::new(58.0, 20.0, 60.0, 30.0)));
        assert_eq!(layout.measure(c), Some(Rect::new(10.0, 20.0, 108.0, 30.0)));
    }

    #[test]
    fn visibility_follows_viewport_unless_overridden() {
        let mut layout = LayoutMap::new(Size::new(800.0, 600.0));
        let below = ElementId::root(4);
        layout.insert(below, Rect::new(0.0, 900.0, 100.0, 50.0));
        assert_eq!(layout.is_visible(below), Some(false));
        layout.set_visible(below, true);
        assert_eq!(layout.is_visible(below), Some(true));
    }

    #[test]
    fn scrolling_moves_the_viewport_window() {
        let mut layout = LayoutMap::new(Size::new(800.0, 600.0));
        let below = ElementId::root(5);
        layout.insert(below, Rect::new(0.0, 900.0, 100.0, 50.0));
        layout.set_scroll_offset(500.0);
        assert_eq!(layout.is_visible(below), Some(true));
        layout.set_viewport(Size::new(400.0, 300.0));
        assert_eq!(layout.viewport(), Some(Rect::new(0.0, 500.0, 400.0, 300.0)));
        assert_eq!(layout.is_visible(below), Some(false));
    }
}
