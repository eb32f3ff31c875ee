//! Builds the fleet's safe operating polygon from vehicle positions.
//!
//! Steps: convex hull of the raw positions, push every hull vertex outward
//! along its exterior bisector, hull the pushed points again, then densify
//! the boundary and order it angularly around the centroid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::common::{
    convex_hull, mean_point, polygon_centroid, Point2, Point3, PlanningError, PlanningResult,
};
use crate::domains::fleet::FleetSnapshot;
use super::region::{HullRegion, SafeZonePolygon};

/// Decimal places kept when de-duplicating densified boundary points.
const ROUNDING_DECIMALS: i32 = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZoneConfig {
    /// Outward push applied to every hull vertex, meters
    pub offset: f64,
    /// Arc-length spacing of densified boundary points, meters
    pub densify_spacing: f64,
}

impl Default for SafeZoneConfig {
    fn default() -> Self {
        Self {
            offset: 5.0,
            densify_spacing: 1.0,
        }
    }
}

pub struct SafeZoneSynthesizer {
    config: SafeZoneConfig,
}

impl SafeZoneSynthesizer {
    pub fn new(config: SafeZoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SafeZoneConfig {
        &self.config
    }

    pub fn synthesize(&self, fleet: &FleetSnapshot) -> PlanningResult<Option<SafeZonePolygon>> {
        self.synthesize_points(&fleet.positions())
    }

    /// `Ok(None)` when fewer than three distinct, non-collinear positions
    /// remain after hulling.
    pub fn synthesize_points(&self, positions: &[Point3]) -> PlanningResult<Option<SafeZonePolygon>> {
        if positions.len() < 3 {
            return Err(PlanningError::invalid_input(format!(
                "Safe zone needs at least 3 positions, got {}",
                positions.len()
            )));
        }
        if !(self.config.offset.is_finite() && self.config.offset > 0.0) {
            return Err(PlanningError::invalid_input("Safe zone offset must be positive"));
        }
        if !(self.config.densify_spacing.is_finite() && self.config.densify_spacing > 0.0) {
            return Err(PlanningError::invalid_input("Densify spacing must be positive"));
        }

        let planar: Vec<Point2> = positions.iter().map(|p| p.xy()).collect();
        let raw_hull = convex_hull(&planar);
        if raw_hull.len() < 3 {
            debug!(points = positions.len(), "fleet positions are degenerate, no safe zone");
            return Ok(None);
        }

        let expanded = expand_hull(&raw_hull, self.config.offset);
        let hull = convex_hull(&expanded);
        if hull.len() < 3 {
            debug!("expanded hull collapsed, no safe zone");
            return Ok(None);
        }

        let depth = positions.iter().map(|p| p.z).sum::<f64>() / positions.len() as f64;
        let center = match polygon_centroid(&hull) {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut vertices = densify(&hull, self.config.densify_spacing);
        sort_angular(&mut vertices, center);

        debug!(
            hull_vertices = hull.len(),
            boundary_points = vertices.len(),
            "synthesized safe zone"
        );

        Ok(Some(SafeZonePolygon {
            vertices,
            centroid: center.with_depth(depth),
            region: HullRegion::from_convex_ring(&hull),
        }))
    }
}

/// Push each vertex of a counter-clockwise convex ring outward by `offset`
/// along the unit exterior bisector of its two adjacent edge normals.
/// Vertices with a degenerate bisector are skipped.
pub fn expand_hull(hull: &[Point2], offset: f64) -> Vec<Point2> {
    let n = hull.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = hull[(i + n - 1) % n];
        let curr = hull[i];
        let next = hull[(i + 1) % n];
        let (Some(e1), Some(e2)) = ((curr - prev).normalized(), (next - curr).normalized()) else {
            continue;
        };
        // Outward normals of a counter-clockwise ring point to the right.
        let n1 = Point2::new(e1.y, -e1.x);
        let n2 = Point2::new(e2.y, -e2.x);
        if let Some(bisector) = (n1 + n2).normalized() {
            out.push(curr + bisector * offset);
        }
    }
    out
}

/// Insert points every `spacing` meters along each edge of the closed ring,
/// then drop duplicates after rounding coordinates.
pub fn densify(ring: &[Point2], spacing: f64) -> Vec<Point2> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |p: Point2, out: &mut Vec<Point2>| {
        let rounded = round_point(p);
        if seen.insert(rounding_key(rounded)) {
            out.push(rounded);
        }
    };

    let n = ring.len();
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        push(a, &mut out);
        let len = a.distance(b);
        let Some(dir) = (b - a).normalized() else {
            continue;
        };
        // Stop short of the far vertex so a second pass adds nothing.
        let limit = len - spacing * 1e-3;
        let mut k = 1;
        while (k as f64) * spacing < limit {
            push(a + dir * (k as f64 * spacing), &mut out);
            k += 1;
        }
    }
    out
}

/// Sort points by polar angle around `center`, ties by distance.
pub fn sort_angular(points: &mut [Point2], center: Point2) {
    points.sort_by(|a, b| {
        let ta = (a.y - center.y).atan2(a.x - center.x);
        let tb = (b.y - center.y).atan2(b.x - center.x);
        ta.total_cmp(&tb)
            .then_with(|| a.distance(center).total_cmp(&b.distance(center)))
    });
}

/// Convenience for callers that already hold a processed ring: densify and
/// re-sort around its own vertex mean.
pub fn normalize_boundary(ring: &[Point2], spacing: f64) -> Vec<Point2> {
    let mut pts = densify(ring, spacing);
    if let Some(center) = mean_point(ring) {
        sort_angular(&mut pts, center);
    }
    pts
}

fn round_point(p: Point2) -> Point2 {
    let scale = 10f64.powi(ROUNDING_DECIMALS);
    Point2::new((p.x * scale).round() / scale, (p.y * scale).round() / scale)
}

fn rounding_key(p: Point2) -> (i64, i64) {
    let scale = 10f64.powi(ROUNDING_DECIMALS);
    ((p.x * scale).round() as i64, (p.y * scale).round() as i64)
}
