//! Three-dimensional point value type.

use std::fmt;

/// A point in 3D space.
///
/// Color channels that may follow the coordinates in a point file are
/// dropped on load, so a point is identified by its coordinates alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Formats as `(x, y, z)`, honouring a precision such as `{:.3}`.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "({:.p$}, {:.p$}, {:.p$})", self.x, self.y, self.z, p = p),
            None => write!(f, "({}, {}, {})", self.x, self.y, self.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(1.5, -2.0, 3.25);
        let b = Point::new(-4.0, 0.5, 10.0);

        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = Point::new(7.0, 8.0, 9.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_distance_unit_diagonal() {
        let d = Point::new(0.0, 0.0, 0.0).distance_to(&Point::new(1.0, 1.0, 1.0));
        assert!((d - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_display_precision() {
        let p = Point::new(1.0, -2.5, 0.12345);
        assert_eq!(format!("{:.3}", p), "(1.000, -2.500, 0.123)");
        assert_eq!(p.to_string(), "(1, -2.5, 0.12345)");
    }

    #[test]
    fn test_from_array() {
        let p: Point = [1.0, 2.0, 3.0].into();
        assert_eq!(p, Point::new(1.0, 2.0, 3.0));
    }
}
