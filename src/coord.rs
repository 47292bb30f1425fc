//! Mapping from SVG user space to the EMU canvas.
//!
//! PowerPoint positions shapes in English Metric Units, 914400 to the inch.
//! A [`CoordinateSystem`] is established once per document from the root's
//! view box and maps user-space coordinates to integer EMU.

use crate::error::ConversionError;
use crate::rect::Rect;

pub const EMU_PER_INCH: f64 = 914_400.0;

/// Target canvas size in EMU.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width_emu: i64,
    pub height_emu: i64,
}

impl CanvasGeometry {
    pub fn new(width_emu: i64, height_emu: i64) -> Self {
        Self {
            width_emu,
            height_emu,
        }
    }
}

impl Default for CanvasGeometry {
    /// A 10 × 7.5 inch slide, PowerPoint's 4:3 default.
    fn default() -> Self {
        Self {
            width_emu: 9_144_000,
            height_emu: 6_858_000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Immutable per-document mapping from user space to EMU.
///
/// The two axes scale independently; there is no aspect-ratio lock.  The
/// view box corners map exactly to `(0, 0)` and the canvas extents.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    viewbox: Rect,
    canvas: CanvasGeometry,
    scale_x: f64,
    scale_y: f64,
}

/// Rounds half-away-from-zero, which is what `f64::round` does.
fn emu_round(v: f64) -> i64 {
    v.round() as i64
}

impl CoordinateSystem {
    /// Establishes the user-space → EMU mapping for one document.
    ///
    /// This is the one place where a malformed document aborts the whole
    /// conversion: a view box with a non-positive or non-finite size admits
    /// no mapping at all.
    pub fn new(viewbox: Rect, canvas: CanvasGeometry) -> Result<Self, ConversionError> {
        let w = viewbox.width();
        let h = viewbox.height();

        if !(w.is_finite() && h.is_finite() && viewbox.x0.is_finite() && viewbox.y0.is_finite()) {
            return Err(ConversionError::InvalidViewport(format!(
                "non-finite view box {:?}",
                viewbox
            )));
        }

        if w <= 0.0 || h <= 0.0 {
            return Err(ConversionError::InvalidViewport(format!(
                "view box size {}x{} must be positive",
                w, h
            )));
        }

        Ok(Self {
            viewbox,
            canvas,
            scale_x: canvas.width_emu as f64 / w,
            scale_y: canvas.height_emu as f64 / h,
        })
    }

    pub fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    pub fn viewbox(&self) -> Rect {
        self.viewbox
    }

    /// Maps a user-space point to integer EMU.
    pub fn to_emu(&self, x: f64, y: f64) -> (i64, i64) {
        (
            emu_round((x - self.viewbox.x0) * self.scale_x),
            emu_round((y - self.viewbox.y0) * self.scale_y),
        )
    }

    /// Maps a user-space length along one axis to integer EMU.
    pub fn length_to_emu(&self, len: f64, axis: Axis) -> i64 {
        match axis {
            Axis::X => emu_round(len * self.scale_x),
            Axis::Y => emu_round(len * self.scale_y),
        }
    }

    /// Maps a user-space rectangle to an EMU offset and extent.
    pub fn rect_to_emu(&self, r: &Rect) -> ((i64, i64), (i64, i64)) {
        let off = self.to_emu(r.x0, r.y0);
        let ext = (
            self.length_to_emu(r.width(), Axis::X),
            self.length_to_emu(r.height(), Axis::Y),
        );
        (off, ext)
    }
}
