use serde::{Deserialize, Serialize};

use crate::common::{point_in_polygon, polygon_area, Point2, Point3};

/// Slack allowed by the half-plane containment test.
pub const CONTAINMENT_EPSILON: f64 = 1e-7;

/// Inequality `normal · p + offset <= 0` with a unit outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfPlane {
    pub normal: Point2,
    pub offset: f64,
}

impl HalfPlane {
    /// Half-plane to the left of the directed edge `a -> b` (the interior of a
    /// counter-clockwise ring). `None` for zero-length edges.
    pub fn left_of(a: Point2, b: Point2) -> Option<Self> {
        let dir = (b - a).normalized()?;
        let normal = Point2::new(dir.y, -dir.x);
        Some(Self { normal, offset: -normal.dot(a) })
    }

    pub fn signed_distance(&self, p: Point2) -> f64 {
        self.normal.dot(p) + self.offset
    }
}

/// The two shapes a safe zone can take. Callers only ever use
/// [`HullRegion::contains`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HullRegion {
    HalfPlanes { planes: Vec<HalfPlane> },
    Polygon { ring: Vec<Point2> },
}

impl HullRegion {
    /// Half-plane form of a convex counter-clockwise ring.
    pub fn from_convex_ring(ring: &[Point2]) -> Self {
        let planes = (0..ring.len())
            .filter_map(|i| HalfPlane::left_of(ring[i], ring[(i + 1) % ring.len()]))
            .collect();
        HullRegion::HalfPlanes { planes }
    }

    pub fn contains(&self, p: Point2) -> bool {
        match self {
            HullRegion::HalfPlanes { planes } => {
                !planes.is_empty() && planes.iter().all(|h| h.signed_distance(p) <= CONTAINMENT_EPSILON)
            }
            HullRegion::Polygon { ring } => point_in_polygon(p, ring),
        }
    }
}

/// Safe operating region for the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZonePolygon {
    /// Closed boundary ring, counter-clockwise, last vertex not repeated.
    pub vertices: Vec<Point2>,
    /// Planar centroid plus the average fleet depth.
    pub centroid: Point3,
    pub region: HullRegion,
}

impl SafeZonePolygon {
    /// Explicit-polygon safe zone, e.g. after carving.
    pub fn from_ring(ring: Vec<Point2>, centroid: Point3) -> Self {
        Self {
            region: HullRegion::Polygon { ring: ring.clone() },
            vertices: ring,
            centroid,
        }
    }

    pub fn contains(&self, p: Point2) -> bool {
        self.region.contains(p)
    }

    pub fn contains_all(&self, points: &[Point3]) -> bool {
        points.iter().all(|p| self.contains(p.xy()))
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    pub fn is_half_plane(&self) -> bool {
        matches!(self.region, HullRegion::HalfPlanes { .. })
    }
}
