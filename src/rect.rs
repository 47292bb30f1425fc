//! Rectangles in SVG user space.

/// Axis-aligned rectangle, stored as two corners.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

// Use our own min() and max() that are acceptable for floating point

fn min(x: f64, y: f64) -> f64 {
    if x <= y {
        x
    } else {
        y
    }
}

fn max(x: f64, y: f64) -> f64 {
    if x >= y {
        x
    } else {
        y
    }
}

impl Rect {
    #[inline]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn from_size(w: f64, h: f64) -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: w,
            y1: h,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn union(&self, rect: &Self) -> Self {
        Self {
            x0: min(self.x0, rect.x0),
            y0: min(self.y0, rect.y0),
            x1: max(self.x1, rect.x1),
            y1: max(self.y1, rect.y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_size() {
        let r = Rect::new(1.0, 2.0, 4.0, 6.0);
        assert_eq!(r.width(), 3.0);
        assert_eq!(r.height(), 4.0);
    }

    #[test]
    fn rect_union() {
        let r = Rect::new(0.0, 0.0, 1.0, 1.0).union(&Rect::new(-1.0, 2.0, 0.5, 3.0));
        assert_eq!(r, Rect::new(-1.0, 0.0, 1.0, 3.0));
    }
}
