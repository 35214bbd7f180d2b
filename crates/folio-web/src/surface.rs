#![forbid(unsafe_code)]

//! In-memory [`Surface`] that records every drawing call.

use folio_core::geometry::Size;
use folio_fx::surface::{Rgba, Surface};

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Resize(Size),
    Clear,
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgba,
    },
    TranslateY(f64),
}

/// Recording surface for deterministic runs and tests.
///
/// The log can be drained between steps; [`RecordingSurface::mutations`]
/// counts every call ever made, so a frozen count proves nothing touched the
/// surface.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    mutations: u64,
    size: Size,
    translate_y: f64,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls since the last [`Self::take_ops`].
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the call log.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Total calls since construction.
    #[must_use]
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn translate_y(&self) -> f64 {
        self.translate_y
    }

    /// Circles drawn since the last clear, in draw order.
    #[must_use]
    pub fn visible_circles(&self) -> usize {
        self.ops
            .iter()
            .rev()
            .take_while(|op| !matches!(op, DrawOp::Clear | DrawOp::Resize(_)))
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }

    fn record(&mut self, op: DrawOp) {
        self.mutations += 1;
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: Size) {
        self.size = size;
        self.record(DrawOp::Resize(size));
    }

    fn clear(&mut self) {
        self.record(DrawOp::Clear);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.record(DrawOp::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn set_translate_y(&mut self, offset: f64) {
        self.translate_y = offset;
        self.record(DrawOp::TranslateY(offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_counts() {
        let mut surface = RecordingSurface::new();
        surface.resize(Size::new(10.0, 10.0));
        surface.fill_circle(1.0, 1.0, 2.0, Rgba::new(255, 255, 255, 0.5));
        surface.clear();
        surface.fill_circle(2.0, 2.0, 2.0, Rgba::new(255, 255, 255, 0.5));
        surface.fill_circle(3.0, 3.0, 2.0, Rgba::new(255, 255, 255, 0.5));
        assert_eq!(surface.visible_circles(), 2);
        assert_eq!(surface.mutations(), 5);
        assert_eq!(surface.take_ops().len(), 5);
        assert!(surface.ops().is_empty());
        assert_eq!(surface.mutations(), 5);
    }
}
