//! Planar geometry kernel shared by the planners.
//!
//! All coordinates are meters in a single planar frame. Depth travels along
//! as the `z` component of [`Point3`] and only enters separation checks.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used for collinearity, containment and zero-length guards.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    /// Vertical position in meters, positive up. Submerged vehicles have
    /// negative `z`, so deeper means smaller.
    pub z: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point2) -> f64 {
        (self - other).norm()
    }

    /// Unit vector in the same direction, `None` for (near) zero vectors.
    pub fn normalized(self) -> Option<Point2> {
        let n = self.norm();
        if n <= EPSILON {
            None
        } else {
            Some(Point2::new(self.x / n, self.y / n))
        }
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(self) -> Point2 {
        Point2::new(-self.y, self.x)
    }

    pub fn rotated(self, angle: f64) -> Point2 {
        let (s, c) = angle.sin_cos();
        Point2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    pub fn lerp(self, other: Point2, t: f64) -> Point2 {
        self + (other - self) * t
    }

    pub fn with_depth(self, z: f64) -> Point3 {
        Point3 { x: self.x, y: self.y, z }
    }
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn distance(self, other: Point3) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn lerp(self, other: Point3, t: f64) -> Point3 {
        Point3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;
    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;
    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_point_on_segment(p: Point2, a: Point2, b: Point2) -> Point2 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq <= EPSILON * EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

pub fn segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Ray-casting point-in-polygon test. The ring is implicitly closed.
pub fn point_in_polygon(p: Point2, ring: &[Point2]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shoelace area, positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        acc += a.cross(b);
    }
    acc * 0.5
}

pub fn polygon_area(ring: &[Point2]) -> f64 {
    signed_area(ring).abs()
}

pub fn mean_point(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point2::default(), |acc, p| acc + *p);
    Some(sum * (1.0 / points.len() as f64))
}

/// Area centroid of a simple polygon; falls back to the vertex mean for
/// near-zero-area rings.
pub fn polygon_centroid(ring: &[Point2]) -> Option<Point2> {
    let area = signed_area(ring);
    if area.abs() <= EPSILON {
        return mean_point(ring);
    }
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let w = a.cross(b);
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Some(Point2::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, without
/// duplicate or collinear vertices. Returns fewer than 3 points when the input
/// is degenerate.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let mut pts: Vec<Point2> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| a.distance(*b) <= EPSILON);
    if pts.len() < 3 {
        return pts;
    }

    let turn = |o: Point2, a: Point2, b: Point2| (a - o).cross(b - o);

    let mut lower: Vec<Point2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= EPSILON {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= EPSILON {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Distance between the closest pair, `None` with fewer than two points.
pub fn min_pairwise_distance(points: &[Point3]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance(points[j]);
            best = Some(best.map_or(d, |b: f64| b.min(d)));
        }
    }
    best
}

/// Wrap an angle to `(-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let mut a = angle.rem_euclid(tau);
    if a > std::f64::consts::PI {
        a -= tau;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(signed_area(&hull) > 0.0);
        assert!((polygon_area(&hull) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_input_has_no_hull() {
        let pts: Vec<Point2> = (0..5).map(|i| Point2::new(i as f64, i as f64)).collect();
        assert!(convex_hull(&pts).len() < 3);
    }

    #[test]
    fn point_in_square() {
        let sq = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(point_in_polygon(Point2::new(0.5, 0.5), &sq));
        assert!(!point_in_polygon(Point2::new(1.5, 0.5), &sq));
        let c = polygon_centroid(&sq).unwrap();
        assert!((c.x - 0.5).abs() < 1e-12 && (c.y - 0.5).abs() < 1e-12);
    }
}
