#![forbid(unsafe_code)]

//! Drawing capability for canvas-backed effects.
//!
//! The particle simulator draws only through [`Surface`]; the browser adapter
//! maps it to a `CanvasRenderingContext2d`, tests record the calls.

use core::fmt;

use folio_core::geometry::Size;

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0, 1].
    pub a: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` form accepted by canvas `fillStyle`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// A 2D drawing target with a CSS vertical translation.
pub trait Surface {
    /// Resize the backing store (clears it).
    fn resize(&mut self, size: Size);

    /// Clear every pixel.
    fn clear(&mut self);

    /// Fill a circle of radius `radius` centered at (`x`, `y`).
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);

    /// Apply `translateY(offset)` to the surface element.
    fn set_translate_y(&mut self, offset: f64);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, size: Size) {
        (**self).resize(size);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        (**self).fill_circle(x, y, radius, color);
    }

    fn set_translate_y(&mut self, offset: f64) {
        (**self).set_translate_y(offset);
    }
}
