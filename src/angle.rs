//! Angle values, stored in radians.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(f64);

impl Angle {
    #[inline]
    pub fn new(rad: f64) -> Self {
        Angle(rad)
    }

    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Angle(deg.to_radians())
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }
}
