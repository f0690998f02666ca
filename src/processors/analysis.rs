//! Geometric analysis over loaded point sets.
//!
//! Every operation is a pure batch computation over points that were loaded
//! for the current request. Pairwise operations are O(n²) per file and never
//! pair points from different files.

use crate::core::point::Point;

/// Two points and the distance between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPair {
    pub first: Point,
    pub second: Point,
    pub distance: f64,
}

/// Closest and farthest pairs found by [`closest_and_farthest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairExtremes {
    pub closest: PointPair,
    pub farthest: PointPair,
}

/// Finds the globally closest and farthest point pairs.
///
/// Pairs are formed within each point set only. On ties the first pair in
/// scan order is kept. Returns `None` when no set holds at least two points.
pub fn closest_and_farthest<'a, I>(sets: I) -> Option<PairExtremes>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut extremes: Option<PairExtremes> = None;

    for points in sets {
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                let pair = PointPair {
                    first: *a,
                    second: *b,
                    distance: a.distance_to(b),
                };

                let found = extremes.get_or_insert(PairExtremes {
                    closest: pair,
                    farthest: pair,
                });
                if pair.distance < found.closest.distance {
                    found.closest = pair;
                }
                if pair.distance > found.farthest.distance {
                    found.farthest = pair;
                }
            }
        }
    }

    extremes
}

/// Axis-aligned box spanning a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCube {
    pub min: Point,
    pub max: Point,
}

impl BoundingCube {
    /// Computes the componentwise bounds of `points`, or `None` if empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut cube = BoundingCube {
            min: *first,
            max: *first,
        };

        for p in rest {
            cube.min.x = cube.min.x.min(p.x);
            cube.min.y = cube.min.y.min(p.y);
            cube.min.z = cube.min.z.min(p.z);
            cube.max.x = cube.max.x.max(p.x);
            cube.max.y = cube.max.y.max(p.y);
            cube.max.z = cube.max.z.max(p.z);
        }

        Some(cube)
    }

    /// The eight corners, x varying slowest and z fastest, min before max.
    pub fn corners(&self) -> [Point; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point::new(lo.x, lo.y, lo.z),
            Point::new(lo.x, lo.y, hi.z),
            Point::new(lo.x, hi.y, lo.z),
            Point::new(lo.x, hi.y, hi.z),
            Point::new(hi.x, lo.y, lo.z),
            Point::new(hi.x, lo.y, hi.z),
            Point::new(hi.x, hi.y, lo.z),
            Point::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// A query sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    /// Builds a sphere from its center and diameter.
    pub fn from_diameter(center: Point, diameter: f64) -> Self {
        Self {
            center,
            radius: diameter / 2.0,
        }
    }

    /// Boundary inclusive.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

/// Points of `points` lying inside `sphere`, in input order.
pub fn points_in_sphere(points: &[Point], sphere: &Sphere) -> Vec<Point> {
    points.iter().filter(|p| sphere.contains(p)).copied().collect()
}

/// Mean distance over all unordered pairs; 0 for fewer than two points.
pub fn average_distance(points: &[Point]) -> f64 {
    let mut total = 0.0;
    let mut pairs: u64 = 0;

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            total += a.distance_to(b);
            pairs += 1;
        }
    }

    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}
