use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::{
    convex_hull, point_in_polygon, polygon_area, polygon_centroid, Point2, PlanningError,
    PlanningResult,
};
use crate::domains::safe_zone::SafeZonePolygon;
use super::clipping::difference;
use super::cutter::{exclusion_cutter, nearest_boundary_point};

/// Pieces smaller than this (m^2) are treated as empty.
const MIN_PIECE_AREA: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarvingConfig {
    /// Minimum width of the access channel cut towards the boundary, meters
    pub channel_width: f64,
    /// How far the channel continues past the boundary; defaults to the
    /// channel width when unset
    pub channel_overshoot: Option<f64>,
    /// Chords used to approximate the exclusion disk
    pub arc_segments: usize,
}

impl Default for CarvingConfig {
    fn default() -> Self {
        Self {
            channel_width: 2.0,
            channel_overshoot: None,
            arc_segments: 32,
        }
    }
}

/// Known obstacle that must end up outside the safe polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenPoint {
    pub point: Point2,
    /// Exclusion buffer radius, meters
    pub buffer: f64,
}

impl ForbiddenPoint {
    pub fn new(point: Point2, buffer: f64) -> Self {
        Self { point, buffer }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarvedBoundary {
    /// Counter-clockwise ring of the surviving region
    pub ring: Vec<Point2>,
    pub exclusions_applied: usize,
    /// Exclusions that would have emptied the shape or hit degenerate geometry
    pub exclusions_skipped: usize,
}

impl CarvedBoundary {
    pub fn contains(&self, p: Point2) -> bool {
        point_in_polygon(p, &self.ring)
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.ring)
    }

    /// Explicit-polygon safe zone at the given depth.
    pub fn into_safe_zone(self, depth: f64) -> SafeZonePolygon {
        let center = polygon_centroid(&self.ring).unwrap_or_default();
        SafeZonePolygon::from_ring(self.ring, center.with_depth(depth))
    }
}

pub struct BoundaryCarver {
    config: CarvingConfig,
}

impl BoundaryCarver {
    pub fn new(config: CarvingConfig) -> Self {
        Self { config }
    }

    /// Remove every forbidden point that lies inside the convex hull of
    /// `boundary`, cutting a channel to the nearest boundary instead of leaving
    /// a hole. Exclusions are applied in input order.
    pub fn carve(&self, boundary: &[Point2], forbidden: &[ForbiddenPoint]) -> PlanningResult<CarvedBoundary> {
        if !(self.config.channel_width.is_finite() && self.config.channel_width > 0.0) {
            return Err(PlanningError::invalid_input("Channel width must be positive"));
        }
        let mut shape = convex_hull(boundary);
        if shape.len() < 3 {
            return Err(PlanningError::invalid_input(format!(
                "Carving needs at least 3 non-collinear boundary points, got {}",
                boundary.len()
            )));
        }

        let mut applied = 0usize;
        let mut skipped = 0usize;

        for (i, f) in forbidden.iter().enumerate() {
            if !point_in_polygon(f.point, &shape) {
                continue;
            }
            match self.exclude(&shape, f) {
                Ok(next) => {
                    debug!(
                        index = i,
                        x = f.point.x,
                        y = f.point.y,
                        area = polygon_area(&next),
                        "applied exclusion"
                    );
                    shape = next;
                    applied += 1;
                }
                Err(e) => {
                    warn!(index = i, x = f.point.x, y = f.point.y, "skipping exclusion: {}", e);
                    skipped += 1;
                }
            }
        }

        Ok(CarvedBoundary { ring: shape, exclusions_applied: applied, exclusions_skipped: skipped })
    }

    /// Carve a synthesized safe zone and return it in explicit-polygon form.
    pub fn carve_zone(&self, zone: &SafeZonePolygon, forbidden: &[ForbiddenPoint]) -> PlanningResult<(SafeZonePolygon, usize, usize)> {
        let carved = self.carve(&zone.vertices, forbidden)?;
        let (applied, skipped) = (carved.exclusions_applied, carved.exclusions_skipped);
        Ok((carved.into_safe_zone(zone.centroid.z), applied, skipped))
    }

    fn exclude(&self, shape: &[Point2], f: &ForbiddenPoint) -> PlanningResult<Vec<Point2>> {
        let exit = nearest_boundary_point(shape, f.point)
            .ok_or_else(|| PlanningError::degenerate("Shape has no boundary"))?;
        let width = self.config.channel_width.max(f.buffer * 0.5);
        let overshoot = self.config.channel_overshoot.unwrap_or(width);
        let cutter = exclusion_cutter(f.point, f.buffer.max(0.0), exit, width, overshoot, self.config.arc_segments);

        let pieces = difference(shape, &cutter).map_err(|e| PlanningError::degenerate(e.to_string()))?;

        let largest = pieces
            .into_iter()
            .map(|p| (polygon_area(&p), p))
            .filter(|(area, _)| *area > MIN_PIECE_AREA)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
            .ok_or_else(|| PlanningError::no_solution("Exclusion would empty the shape"))?;

        if point_in_polygon(f.point, &largest) {
            return Err(PlanningError::degenerate("Forbidden point survived the cut"));
        }
        Ok(largest)
    }
}

