use serde::{Deserialize, Serialize};
use crate::common::{point_in_polygon, segment_distance, Point2, PlanningError, PlanningResult};

/// Arena in which the fleet operates and obstacles are reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub min_x: f64, pub max_x: f64,
    pub min_y: f64, pub max_y: f64,
}

impl ArenaBounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    pub fn validate(&self) -> PlanningResult<()> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y].iter().all(|v| v.is_finite());
        if !finite || self.max_x <= self.min_x || self.max_y <= self.min_y {
            return Err(PlanningError::invalid_input(format!(
                "Arena bounds are empty or inverted: x [{}, {}], y [{}, {}]",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x &&
        p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self::new(-100.0, 100.0, -100.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub shape: ObstacleShape,
    /// Safety margin in meters kept clear around the shape.
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleShape {
    Circle { center: Point2, radius: f64 },
    Polygon { vertices: Vec<Point2> },
}

impl Obstacle {
    pub fn circle(id: impl Into<String>, center: Point2, radius: f64, margin: f64) -> Self {
        Self { id: id.into(), shape: ObstacleShape::Circle { center, radius }, margin }
    }

    pub fn polygon(id: impl Into<String>, vertices: Vec<Point2>, margin: f64) -> Self {
        Self { id: id.into(), shape: ObstacleShape::Polygon { vertices }, margin }
    }

    /// True if `p` lies inside the shape or within `margin` of it.
    pub fn blocks(&self, p: Point2, margin: f64) -> bool {
        match &self.shape {
            ObstacleShape::Circle { center, radius } => center.distance(p) <= radius + margin,
            ObstacleShape::Polygon { vertices } => {
                if vertices.is_empty() {
                    return false;
                }
                if vertices.len() >= 3 && point_in_polygon(p, vertices) {
                    return true;
                }
                if vertices.len() == 1 {
                    return vertices[0].distance(p) <= margin;
                }
                let n = vertices.len();
                // Open polyline for two vertices, closed ring otherwise.
                let edges = if n == 2 { 1 } else { n };
                (0..edges).any(|i| segment_distance(p, vertices[i], vertices[(i + 1) % n]) <= margin)
            }
        }
    }

    /// Representative point used when the obstacle has to be excluded from a
    /// safe zone. `None` for a polygon without vertices, which blocks nothing.
    pub fn exclusion_center(&self) -> Option<Point2> {
        match &self.shape {
            ObstacleShape::Circle { center, .. } => Some(*center),
            ObstacleShape::Polygon { vertices } => crate::common::mean_point(vertices),
        }
    }

    /// Radius around [`Obstacle::exclusion_center`] that covers the shape plus
    /// its margin.
    pub fn exclusion_radius(&self) -> Option<f64> {
        let c = self.exclusion_center()?;
        Some(match &self.shape {
            ObstacleShape::Circle { radius, .. } => radius + self.margin,
            ObstacleShape::Polygon { vertices } => {
                let reach = vertices.iter().map(|v| v.distance(c)).fold(0.0, f64::max);
                reach + self.margin
            }
        })
    }
}
